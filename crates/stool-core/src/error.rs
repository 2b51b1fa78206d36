//! Error types for the stool-core library.
//!
//! Every failure is terminal for the invocation that hit it. The variants are
//! grouped by [`ErrorKind`] so callers can tell an unreadable input apart from
//! a malformed data URL or a broken output sink.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all stool operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to stat, open or read an input file
    #[error("failed to access file '{path}': {source}")]
    FileAccess {
        /// Path of the input file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The input path exists but is not a regular file
    #[error("not a regular file: '{path}'")]
    NotAFile {
        /// Path of the input
        path: PathBuf,
    },

    /// Failed to read standard input
    #[error("failed to read standard input: {source}")]
    StdinRead {
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input is not a well-formed data URL
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Failed to write to the output sink
    #[error("failed to write output: {source}")]
    Write {
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a data URL (or a media type inside one) fails to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Input does not start with `data:`
    #[error("invalid data URL: missing 'data:' scheme")]
    MissingScheme,

    /// No `,` between the metadata and the payload
    #[error("invalid data URL: missing ',' separator before the payload")]
    MissingSeparator,

    /// Media type or one of its parameters is malformed
    #[error("invalid media type '{value}': {reason}")]
    InvalidMediaType {
        /// The offending text
        value: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Payload declared as base64 does not decode
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// A `%` in the payload is not followed by two hex digits
    #[error("invalid percent-escape at payload offset {offset}")]
    InvalidEscape {
        /// Byte offset of the `%` within the payload
        offset: usize,
    },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing file, directory given, open or read failure
    FileAccess,
    /// Malformed data URL input
    Parse,
    /// Output sink failure
    Write,
}

impl Error {
    /// Creates a new file access error
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Creates a new not-a-regular-file error
    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    /// Creates a new stdin read error
    pub fn stdin_read(source: std::io::Error) -> Self {
        Self::StdinRead { source }
    }

    /// Creates a new output write error
    pub fn write(source: std::io::Error) -> Self {
        Self::Write { source }
    }

    /// Returns the category this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileAccess { .. } | Self::NotAFile { .. } | Self::StdinRead { .. } => {
                ErrorKind::FileAccess
            }
            Self::Parse(_) => ErrorKind::Parse,
            Self::Write { .. } => ErrorKind::Write,
        }
    }

    /// Returns true if the input was read but is not a valid data URL
    pub fn is_parse_error(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }
}

impl ParseError {
    pub(crate) fn invalid_media_type(value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidMediaType {
            value: value.into(),
            reason,
        }
    }
}

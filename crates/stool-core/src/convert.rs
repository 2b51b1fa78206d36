//! Single-shot conversion between an input source and data URL text.
//!
//! [`Converter`] is the operation behind `stool dataurl`: it opens the input,
//! checks it, buffers it fully and either encodes it as a data URL or decodes
//! it from one, writing the result to an output sink.
//!
//! ```no_run
//! use stool_core::convert::{ConvertConfig, Converter, Source};
//!
//! let converter = Converter::with_config(ConvertConfig::new().ascii(true));
//! let mut stdout = std::io::stdout().lock();
//! converter.run(&Source::from_arg("notes.txt"), &mut stdout)?;
//! # Ok::<(), stool_core::Error>(())
//! ```

use crate::dataurl::{DataUrl, Encoding, MediaType};
use crate::error::{Error, Result};
use crate::mime;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Inputs at or above this size trigger a warning (2 MiB)
pub const DEFAULT_SIZE_WARNING_THRESHOLD: u64 = 2 * 1024 * 1024;

/// Where the input bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input
    Stdin,
    /// A file on disk
    Path(PathBuf),
}

impl Source {
    /// Interprets a command-line argument, `-` meaning standard input
    pub fn from_arg(arg: impl AsRef<Path>) -> Self {
        let arg = arg.as_ref();
        if arg.as_os_str() == "-" {
            Source::Stdin
        } else {
            Source::Path(arg.to_path_buf())
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("<stdin>"),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Configuration for a conversion
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Decode data URL text instead of encoding raw bytes
    pub decode: bool,
    /// Encode with percent-escaped ASCII instead of base64
    pub ascii: bool,
    /// Media type overriding extension based detection
    pub mime_type: Option<String>,
    /// Input size at which a warning is logged
    pub size_warning_threshold: u64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            decode: false,
            ascii: false,
            mime_type: None,
            size_warning_threshold: DEFAULT_SIZE_WARNING_THRESHOLD,
        }
    }
}

impl ConvertConfig {
    /// Creates a new config with default values (base64 encode, detected type)
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects decode mode
    pub fn decode(mut self, decode: bool) -> Self {
        self.decode = decode;
        self
    }

    /// Selects ASCII payload encoding
    pub fn ascii(mut self, ascii: bool) -> Self {
        self.ascii = ascii;
        self
    }

    /// Forces the media type of encoded output
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Sets the size warning threshold
    pub fn size_warning_threshold(mut self, bytes: u64) -> Self {
        self.size_warning_threshold = bytes;
        self
    }

    /// The payload encoding these flags select
    pub fn encoding(&self) -> Encoding {
        if self.ascii {
            Encoding::Ascii
        } else {
            Encoding::Base64
        }
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Media type written (encode) or declared by the input (decode)
    pub media_type: MediaType,
    /// Number of input bytes consumed
    pub bytes_read: usize,
    /// Number of bytes written to the output sink
    pub bytes_written: usize,
}

/// Runs encode or decode conversions
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    /// Creates a converter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter with custom configuration
    pub fn with_config(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Converts `source` into `out`
    ///
    /// A file source is checked before anything is read: it must exist and be
    /// a regular file. The file handle is dropped on every return path.
    pub fn run<W: Write + ?Sized>(&self, source: &Source, out: &mut W) -> Result<Conversion> {
        match source {
            Source::Stdin => {
                let stdin = std::io::stdin().lock();
                self.convert(stdin, None, false, out).map_err(stdin_error)
            }
            Source::Path(path) => {
                let metadata = std::fs::metadata(path).map_err(|e| Error::file_access(path, e))?;
                if !metadata.is_file() {
                    return Err(Error::not_a_file(path));
                }
                self.warn_if_large(source, metadata.len());

                let file = File::open(path).map_err(|e| Error::file_access(path, e))?;
                self.convert(file, Some(path), true, out)
                    .map_err(|e| read_error(e, path))
            }
        }
    }

    /// Converts bytes from any reader into `out`
    ///
    /// `file_name`, when given, is used for media type detection and in the
    /// size warning. Read failures are reported as [`Error::StdinRead`].
    pub fn run_reader<R: Read, W: Write + ?Sized>(
        &self,
        reader: R,
        file_name: Option<&Path>,
        out: &mut W,
    ) -> Result<Conversion> {
        self.convert(reader, file_name, false, out)
            .map_err(stdin_error)
    }

    /// `size_checked` is set when the size was already checked via metadata
    fn convert<R: Read, W: Write + ?Sized>(
        &self,
        mut reader: R,
        file_name: Option<&Path>,
        size_checked: bool,
        out: &mut W,
    ) -> std::result::Result<Conversion, ConvertFailure> {
        let mut input = Vec::new();
        reader
            .read_to_end(&mut input)
            .map_err(ConvertFailure::Read)?;
        trace!("Read {} input bytes", input.len());

        if !size_checked {
            let source = file_name.map_or(Source::Stdin, |p| Source::Path(p.to_path_buf()));
            self.warn_if_large(&source, input.len() as u64);
        }

        let conversion = if self.config.decode {
            self.decode(&input, out)?
        } else {
            self.encode(input, file_name, out)?
        };

        out.flush().map_err(Error::write)?;
        Ok(conversion)
    }

    fn encode<W: Write + ?Sized>(
        &self,
        input: Vec<u8>,
        file_name: Option<&Path>,
        out: &mut W,
    ) -> Result<Conversion> {
        let media_type: MediaType =
            mime::resolve(self.config.mime_type.as_deref(), file_name).parse()?;
        let encoding = self.config.encoding();
        debug!("Encoding {} bytes as {} ({})", input.len(), media_type, encoding);

        let bytes_read = input.len();
        let url = DataUrl::new(input, media_type).with_encoding(encoding);
        let bytes_written = url.write_to(out)?;

        Ok(Conversion {
            media_type: url.media_type().clone(),
            bytes_read,
            bytes_written,
        })
    }

    fn decode<W: Write + ?Sized>(&self, input: &[u8], out: &mut W) -> Result<Conversion> {
        let url = DataUrl::parse(input)?;
        debug!(
            "Decoded {} bytes of {} ({})",
            url.data().len(),
            url.media_type(),
            url.encoding()
        );

        out.write_all(url.data()).map_err(Error::write)?;

        Ok(Conversion {
            media_type: url.media_type().clone(),
            bytes_read: input.len(),
            bytes_written: url.data().len(),
        })
    }

    fn warn_if_large(&self, source: &Source, size: u64) {
        if size >= self.config.size_warning_threshold {
            warn!("Input {} is too large ({} bytes)", source, size);
        }
    }
}

/// Read errors need the source to become an [`Error`]; everything else
/// already is one.
enum ConvertFailure {
    Read(std::io::Error),
    Other(Error),
}

impl From<Error> for ConvertFailure {
    fn from(e: Error) -> Self {
        ConvertFailure::Other(e)
    }
}

fn stdin_error(failure: ConvertFailure) -> Error {
    match failure {
        ConvertFailure::Read(e) => Error::stdin_read(e),
        ConvertFailure::Other(e) => e,
    }
}

fn read_error(failure: ConvertFailure, path: &Path) -> Error {
    match failure {
        ConvertFailure::Read(e) => Error::file_access(path, e),
        ConvertFailure::Other(e) => e,
    }
}

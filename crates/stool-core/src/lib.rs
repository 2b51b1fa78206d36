//! # stool-core
//!
//! A library for converting bytes to and from RFC 2397 data URLs.
//!
//! This crate provides the core functionality for:
//! - Encoding bytes plus a media type as `data:` URL text (base64 or ASCII)
//! - Decoding `data:` URL text back into bytes and a media type
//! - Detecting a MIME type from a file name
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dataurl`]: The data URL codec and media type model
//! - [`mime`]: Extension based MIME type lookup
//! - [`convert`]: File/stdin driven encode and decode
//! - [`version`]: Build metadata
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use stool_core::{ConvertConfig, Converter, Source};
//!
//! let converter = Converter::with_config(ConvertConfig::new().mime_type("image/png"));
//! let mut out = Vec::new();
//! converter.run(&Source::from_arg("./logo.png"), &mut out)?;
//! println!("{}", String::from_utf8_lossy(&out));
//! # Ok::<(), stool_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod convert;
pub mod dataurl;
pub mod error;
pub mod mime;
pub mod version;

// Re-export primary types for convenience
pub use convert::{Conversion, ConvertConfig, Converter, Source};
pub use dataurl::{DataUrl, Encoding, MediaType};
pub use error::{Error, ErrorKind, ParseError, Result};
pub use version::BuildInfo;

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

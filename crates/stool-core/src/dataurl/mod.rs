//! RFC 2397 data URL codec.
//!
//! A data URL embeds content and its media type directly in URI text:
//!
//! ```text
//! data:[<mediatype>][;<name>=<value>]*[;base64],<data>
//! ```
//!
//! ## Encoding
//!
//! The payload is either base64 (standard alphabet, padded, no line breaks)
//! or the percent-escaped ASCII form described in [`escape`]. Encoding always
//! buffers the whole payload; there is no incremental encoder.
//!
//! ## Decoding
//!
//! Decoding is all-or-nothing: any malformed piece fails the whole input with
//! a [`ParseError`] and no bytes are produced.
//!
//! ```
//! use stool_core::dataurl::{DataUrl, Encoding, MediaType};
//!
//! let url = DataUrl::new(b"hi".to_vec(), MediaType::new("text", "plain"));
//! assert_eq!(url.to_string(), "data:text/plain;base64,aGk=");
//!
//! let decoded: DataUrl = "data:text/plain,hi%21".parse()?;
//! assert_eq!(decoded.data(), b"hi!");
//! assert_eq!(decoded.encoding(), Encoding::Ascii);
//! # Ok::<(), stool_core::error::ParseError>(())
//! ```

pub mod escape;
mod media_type;

use crate::error::{Error, ParseError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use tracing::trace;

pub use media_type::MediaType;

/// URI scheme prefix of every data URL
pub const SCHEME: &str = "data:";

/// Metadata marker selecting base64 payload encoding
const BASE64_MARKER: &str = "base64";

/// Payload encoding of a data URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Standard base64, marked with `;base64`
    #[default]
    Base64,
    /// Percent-escaped ASCII, no marker
    Ascii,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Base64 => f.write_str("base64"),
            Encoding::Ascii => f.write_str("ascii"),
        }
    }
}

/// A decoded data URL: payload bytes plus the media type they are tagged with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    media_type: MediaType,
    encoding: Encoding,
    data: Vec<u8>,
}

impl DataUrl {
    /// Creates a data URL using base64 encoding
    pub fn new(data: impl Into<Vec<u8>>, media_type: MediaType) -> Self {
        Self {
            media_type,
            encoding: Encoding::default(),
            data: data.into(),
        }
    }

    /// Sets the payload encoding used when rendering
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The media type declared for the payload
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// The payload encoding
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The raw payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the data URL, returning the payload bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Renders the data URL into `out`, returning the number of bytes written
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize> {
        let text = self.to_string();
        out.write_all(text.as_bytes()).map_err(Error::write)?;
        trace!("Wrote {} bytes of data URL text", text.len());
        Ok(text.len())
    }

    /// Parses data URL text
    ///
    /// Trailing `\r` and `\n` bytes are ignored. The input is otherwise taken
    /// as-is: leading whitespace makes the scheme check fail.
    pub fn parse(input: &[u8]) -> std::result::Result<Self, ParseError> {
        let input = trim_line_ending(input);

        let rest = match input.get(..SCHEME.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(SCHEME.as_bytes()) => {
                &input[SCHEME.len()..]
            }
            _ => return Err(ParseError::MissingScheme),
        };

        let comma = rest
            .iter()
            .position(|&b| b == b',')
            .ok_or(ParseError::MissingSeparator)?;
        let (metadata, payload) = (&rest[..comma], &rest[comma + 1..]);

        let metadata = std::str::from_utf8(metadata).map_err(|_| {
            ParseError::invalid_media_type(
                String::from_utf8_lossy(metadata),
                "metadata is not valid UTF-8",
            )
        })?;
        let (media_type, encoding) = parse_metadata(metadata)?;

        trace!(
            "Parsed data URL metadata: {} ({}), {} payload bytes",
            media_type,
            encoding,
            payload.len()
        );

        let data = match encoding {
            Encoding::Base64 => STANDARD.decode(payload)?,
            Encoding::Ascii => escape::unescape(payload)?,
        };

        Ok(Self {
            media_type,
            encoding,
            data,
        })
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SCHEME, self.media_type)?;
        match self.encoding {
            Encoding::Base64 => write!(f, ";{},{}", BASE64_MARKER, STANDARD.encode(&self.data)),
            Encoding::Ascii => write!(f, ",{}", escape::escape(&self.data)),
        }
    }
}

impl FromStr for DataUrl {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s.as_bytes())
    }
}

/// Splits `[<mediatype>][;name=value]*[;base64]` into its parts
fn parse_metadata(metadata: &str) -> std::result::Result<(MediaType, Encoding), ParseError> {
    let mut segments: Vec<&str> = metadata.split(';').collect();

    let mut encoding = Encoding::Ascii;
    if segments.len() > 1
        && segments
            .last()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(BASE64_MARKER))
    {
        segments.pop();
        encoding = Encoding::Base64;
    }

    let essence = segments[0].trim();
    let params = &segments[1..];

    let media_type = if essence.is_empty() {
        if params.is_empty() {
            MediaType::rfc2397_default()
        } else {
            let mut media_type = MediaType::new("text", "plain");
            media_type.parse_params(params.iter().copied())?;
            media_type
        }
    } else {
        let mut media_type: MediaType = essence.parse()?;
        media_type.parse_params(params.iter().copied())?;
        media_type
    };

    Ok((media_type, encoding))
}

fn trim_line_ending(mut input: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r' | b'\n'] = input {
        input = rest;
    }
    input
}

/// Encodes `data` as a data URL string
pub fn encode(data: &[u8], media_type: &MediaType, encoding: Encoding) -> String {
    DataUrl::new(data, media_type.clone())
        .with_encoding(encoding)
        .to_string()
}

/// Decodes data URL text into its payload and declared media type
pub fn decode(input: &[u8]) -> std::result::Result<(Vec<u8>, MediaType), ParseError> {
    let url = DataUrl::parse(input)?;
    let media_type = url.media_type().clone();
    Ok((url.into_data(), media_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_bytes() -> Vec<u8> {
        let mut bytes: Vec<u8> = (0..=255).collect();
        bytes.extend_from_slice(b"data:,;base64% plain text");
        bytes
    }

    #[test]
    fn test_encode_base64() {
        let mt = MediaType::new("text", "plain");
        assert_eq!(
            encode(b"Hello, World!", &mt, Encoding::Base64),
            "data:text/plain;base64,SGVsbG8sIFdvcmxkIQ=="
        );
    }

    #[test]
    fn test_encode_ascii() {
        let mt = MediaType::new("text", "plain").with_param("charset", "utf-8");
        assert_eq!(
            encode(b"Hello, World!", &mt, Encoding::Ascii),
            "data:text/plain;charset=utf-8,Hello,%20World!"
        );
    }

    #[test]
    fn test_encode_empty_payload() {
        let mt = MediaType::octet_stream();
        assert_eq!(
            encode(b"", &mt, Encoding::Base64),
            "data:application/octet-stream;base64,"
        );
        assert_eq!(encode(b"", &mt, Encoding::Ascii), "data:application/octet-stream,");
    }

    #[test]
    fn test_round_trip_both_encodings() {
        let data = sample_bytes();
        for mt in ["image/png", "application/octet-stream", "text/plain;charset=utf-8"] {
            let mt: MediaType = mt.parse().unwrap();
            for encoding in [Encoding::Base64, Encoding::Ascii] {
                let text = encode(&data, &mt, encoding);
                let (decoded, decoded_mt) = decode(text.as_bytes()).unwrap();
                assert_eq!(decoded, data, "{encoding} payload for {mt}");
                assert_eq!(decoded_mt, mt, "{encoding} media type for {mt}");
            }
        }
    }

    #[test]
    fn test_decode_default_media_type() {
        let url: DataUrl = "data:,A%20B".parse().unwrap();
        assert_eq!(url.data(), b"A B");
        assert_eq!(url.media_type().to_string(), "text/plain;charset=US-ASCII");

        let url: DataUrl = "data:;charset=utf-8;base64,4oKs".parse().unwrap();
        assert_eq!(url.data(), "€".as_bytes());
        assert_eq!(url.media_type().to_string(), "text/plain;charset=utf-8");
    }

    #[test]
    fn test_decode_charset_and_marker_case() {
        let url: DataUrl = "DATA:text/plain;charset=UTF-8;BASE64,aGk=\r\n".parse().unwrap();
        assert_eq!(url.encoding(), Encoding::Base64);
        assert_eq!(url.media_type().charset(), Some("UTF-8"));
        assert_eq!(url.data(), b"hi");
    }

    #[test]
    fn test_decode_payload_may_contain_commas() {
        let url: DataUrl = "data:text/csv,a,b,c".parse().unwrap();
        assert_eq!(url.data(), b"a,b,c");
    }

    #[test]
    fn test_decode_missing_scheme() {
        assert_eq!(
            DataUrl::parse(b"not-a-data-url").unwrap_err(),
            ParseError::MissingScheme
        );
        assert_eq!(DataUrl::parse(b"dat").unwrap_err(), ParseError::MissingScheme);
        assert_eq!(
            DataUrl::parse(b" data:,x").unwrap_err(),
            ParseError::MissingScheme
        );
    }

    #[test]
    fn test_decode_missing_separator() {
        assert_eq!(
            DataUrl::parse(b"data:text/plain;base64").unwrap_err(),
            ParseError::MissingSeparator
        );
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(matches!(
            DataUrl::parse(b"data:text/plain;base64,QQ==extra").unwrap_err(),
            ParseError::InvalidBase64(_)
        ));
        assert!(matches!(
            DataUrl::parse(b"data:text/plain;base64,QQ=").unwrap_err(),
            ParseError::InvalidBase64(_)
        ));
        assert!(matches!(
            DataUrl::parse(b"data:;base64,a*b=").unwrap_err(),
            ParseError::InvalidBase64(_)
        ));
    }

    #[test]
    fn test_decode_invalid_escape() {
        assert_eq!(
            DataUrl::parse(b"data:,%G1").unwrap_err(),
            ParseError::InvalidEscape { offset: 0 }
        );
    }

    #[test]
    fn test_decode_invalid_media_type() {
        assert!(matches!(
            DataUrl::parse(b"data:text;base64,aGk=").unwrap_err(),
            ParseError::InvalidMediaType { .. }
        ));
        assert!(matches!(
            DataUrl::parse(b"data:text/plain;charset,hi").unwrap_err(),
            ParseError::InvalidMediaType { .. }
        ));
    }

    #[test]
    fn test_separator_in_param_value_is_rejected() {
        for mt in ["text/plain;name=\"a,b\"", "text/plain;name=\"a b\""] {
            assert!(matches!(
                mt.parse::<MediaType>(),
                Err(ParseError::InvalidMediaType { .. })
            ));
        }

        // A quoted token value survives the round trip unquoted.
        let mt: MediaType = "text/plain;name=\"report.txt\"".parse().unwrap();
        for encoding in [Encoding::Base64, Encoding::Ascii] {
            let text = encode(b"xyz", &mt, encoding);
            let (data, decoded_mt) = decode(text.as_bytes()).unwrap();
            assert_eq!(data, b"xyz");
            assert_eq!(decoded_mt, mt);
            assert!(!text.contains(' '));
        }
    }

    #[test]
    fn test_write_to_reports_length() {
        let url = DataUrl::new(b"abc".to_vec(), MediaType::octet_stream());
        let mut out = Vec::new();
        let written = url.write_to(&mut out).unwrap();
        assert_eq!(written, out.len());
        assert_eq!(out, b"data:application/octet-stream;base64,YWJj");
    }
}

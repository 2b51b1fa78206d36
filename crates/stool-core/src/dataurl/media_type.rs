//! Media type model used in the metadata section of a data URL.

use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

/// A parsed `type/subtype` with its `name=value` parameters
///
/// Type, subtype and parameter names are lowercased. Parameter values and
/// their order are kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    type_: String,
    subtype: String,
    params: Vec<(String, String)>,
}

impl MediaType {
    /// Creates a media type without parameters
    pub fn new(type_: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            type_: type_.into().to_ascii_lowercase(),
            subtype: subtype.into().to_ascii_lowercase(),
            params: Vec::new(),
        }
    }

    /// RFC 2397 default for a data URL that names no media type:
    /// `text/plain;charset=US-ASCII`
    pub fn rfc2397_default() -> Self {
        Self::new("text", "plain").with_param("charset", "US-ASCII")
    }

    /// `application/octet-stream`
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    /// Adds or replaces a parameter
    ///
    /// The value is rendered verbatim, so it should be an RFC 2045 token.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_param(name, value);
        self
    }

    fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    /// The top-level type, e.g. `image`
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// The subtype, e.g. `png`
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// `type/subtype` without parameters
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    /// All parameters in declaration order
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Looks up a parameter by (case-insensitive) name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `charset` parameter, if any
    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }

    /// Parses the `;`-separated segments that follow `type/subtype`
    ///
    /// Values may be quoted, but the unquoted value must still be a token:
    /// rendering writes it back bare, where a `,`, `;` or space would change
    /// how the data URL splits.
    pub(crate) fn parse_params<'a>(
        &mut self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ParseError> {
        for segment in segments {
            let segment = segment.trim();
            let (name, value) = segment.split_once('=').ok_or_else(|| {
                ParseError::invalid_media_type(segment, "parameter is missing '='")
            })?;
            let name = name.trim();
            if !is_token(name) {
                return Err(ParseError::invalid_media_type(
                    segment,
                    "invalid parameter name",
                ));
            }
            let value = unquote(value.trim());
            if !is_token(value) {
                return Err(ParseError::invalid_media_type(
                    segment,
                    "parameter value must be a non-empty token",
                ));
            }
            self.set_param(name, value);
        }
        Ok(())
    }
}

impl Default for MediaType {
    fn default() -> Self {
        Self::octet_stream()
    }
}

impl FromStr for MediaType {
    type Err = ParseError;

    /// Parses `type/subtype[;name=value]*`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split(';');
        let essence = segments.next().unwrap_or_default().trim();

        let (type_, subtype) = essence
            .split_once('/')
            .ok_or_else(|| ParseError::invalid_media_type(s, "expected 'type/subtype'"))?;
        if !is_token(type_) || !is_token(subtype) {
            return Err(ParseError::invalid_media_type(
                s,
                "type and subtype must be non-empty tokens",
            ));
        }

        let mut media_type = MediaType::new(type_, subtype);
        media_type.parse_params(segments)?;
        Ok(media_type)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.params {
            write!(f, ";{}={}", name, value)?;
        }
        Ok(())
    }
}

/// RFC 2045 token: visible ASCII minus tspecials
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')'
                        | b'<'
                        | b'>'
                        | b'@'
                        | b','
                        | b';'
                        | b':'
                        | b'\\'
                        | b'"'
                        | b'/'
                        | b'['
                        | b']'
                        | b'?'
                        | b'='
                )
        })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

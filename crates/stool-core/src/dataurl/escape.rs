//! Percent-escaping for the ASCII form of a data URL payload.
//!
//! ## Escaping rule
//!
//! A byte is written literally when it is an ASCII letter or digit, one of the
//! RFC 2396 unreserved marks `-_.!~*'()`, or one of the reserved characters
//! `;/?:@&=+$,`. Every other byte is written as `%XX` with uppercase hex
//! digits. That covers `%` itself, space (always `%20`, never `+`), `#`, `"`,
//! `<`, `>`, control bytes and everything at or above `0x7F`.
//!
//! Unescaping accepts hex digits of either case and passes every byte that is
//! not part of an escape through unchanged.

use crate::error::ParseError;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Returns true if `byte` is written without escaping
pub fn is_literal(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'_'
                | b'.'
                | b'!'
                | b'~'
                | b'*'
                | b'\''
                | b'('
                | b')'
                | b';'
                | b'/'
                | b'?'
                | b':'
                | b'@'
                | b'&'
                | b'='
                | b'+'
                | b'$'
                | b','
        )
}

/// Percent-escape `data` into an ASCII string
pub fn escape(data: &[u8]) -> String {
    let escaped = data.iter().filter(|&&b| !is_literal(b)).count();
    let mut out = String::with_capacity(data.len() + escaped * 2);

    for &byte in data {
        if is_literal(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX_UPPER[(byte >> 4) as usize] as char);
            out.push(HEX_UPPER[(byte & 0x0F) as usize] as char);
        }
    }

    out
}

/// Reverse [`escape`], failing on any `%` not followed by two hex digits
pub fn unescape(input: &[u8]) -> Result<Vec<u8>, ParseError> {
    let mut out = Vec::with_capacity(input.len());
    let mut position = 0;

    while position < input.len() {
        let byte = input[position];
        if byte != b'%' {
            out.push(byte);
            position += 1;
            continue;
        }

        let hi = input.get(position + 1).copied().and_then(hex_value);
        let lo = input.get(position + 2).copied().and_then(hex_value);
        match (hi, lo) {
            (Some(hi), Some(lo)) => {
                out.push((hi << 4) | lo);
                position += 3;
            }
            _ => return Err(ParseError::InvalidEscape { offset: position }),
        }
    }

    Ok(out)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

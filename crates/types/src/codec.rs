//! Hex text to byte buffer conversion.
//!
//! Strict decoding goes through the `hex` crate. Lenient decoding keeps the
//! forgiving behaviour older token scripts rely on: unknown characters count as
//! a zero nibble and a dangling final digit is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RaError, Result};

/// How malformed hex or decimal parameter text is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Reject odd-length hex, non-hex characters and non-numeric decimals.
    #[default]
    Strict,
    /// Never fail; bad characters decode as zero.
    Lenient,
}

/// An owned sequence of raw bytes decoded from hex text.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Buffer(Vec<u8>);

impl Buffer {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex rendering, two digits per byte.
    #[must_use]
    pub fn to_hex(&self) -> String {
        encode(&self.0)
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer({})", self.to_hex())
    }
}

/// Encodes bytes as lowercase hex; an empty slice yields an empty string.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes `text` under `policy`. `param` names the source for error messages.
///
/// # Errors
///
/// Under [`DecodePolicy::Strict`], returns [`RaError::MalformedInput`] for odd
/// length or a character outside `[0-9A-Fa-f]`. Lenient decoding never fails.
pub fn decode(param: &str, text: &str, policy: DecodePolicy) -> Result<Buffer> {
    match policy {
        DecodePolicy::Strict => hex::decode(text)
            .map(Buffer)
            .map_err(|e| RaError::malformed(param, strict_reason(&e))),
        DecodePolicy::Lenient => Ok(Buffer(decode_lenient(text))),
    }
}

fn strict_reason(err: &hex::FromHexError) -> String {
    match err {
        hex::FromHexError::OddLength => "odd number of hex digits".to_string(),
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            format!("invalid hex character {c:?} at position {index}")
        }
        hex::FromHexError::InvalidStringLength => "invalid hex length".to_string(),
    }
}

fn lenient_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'A'..=b'Z' => c - b'A' + 10,
        b'a'..=b'z' => c - b'a' + 10,
        _ => 0,
    }
}

fn decode_lenient(text: &str) -> Vec<u8> {
    text.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            lenient_nibble(pair[0])
                .wrapping_mul(16)
                .wrapping_add(lenient_nibble(pair[1]))
        })
        .collect()
}

/// Parses a decimal byte value (version and life-cycle fields) under `policy`.
///
/// Lenient parsing behaves like C `atoi` truncated to a byte: leading
/// whitespace and one sign are accepted, parsing stops at the first non-digit,
/// and no digits at all means zero.
///
/// # Errors
///
/// Under [`DecodePolicy::Strict`], returns [`RaError::MalformedInput`] unless
/// `text` is a decimal in `0..=255`.
pub fn parse_decimal(param: &str, text: &str, policy: DecodePolicy) -> Result<u8> {
    match policy {
        DecodePolicy::Strict => text
            .trim()
            .parse::<u8>()
            .map_err(|e| RaError::malformed(param, format!("expected a decimal 0-255: {e}"))),
        DecodePolicy::Lenient => Ok(parse_decimal_lenient(text)),
    }
}

fn parse_decimal_lenient(text: &str) -> u8 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u8, |acc, d| acc.wrapping_mul(10).wrapping_add(d - b'0'));
    if negative { value.wrapping_neg() } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(text: &str) -> Result<Buffer> {
        decode("test", text, DecodePolicy::Strict)
    }

    #[test]
    fn test_decode_mixed_case() {
        let buf = strict("AaBb0f").unwrap();
        assert_eq!(buf.as_bytes(), &[0xaa, 0xbb, 0x0f]);
    }

    #[test]
    fn test_encode_is_lowercase() {
        assert_eq!(encode(&[0xAA, 0xBB, 0xCC]), "aabbcc");
        assert_eq!(encode(&[0x00, 0x01]), "0001");
    }

    #[test]
    fn test_encode_decode_lowercases_input() {
        for input in ["DEADBEEF", "00ff10", "A0b1C2d3"] {
            let hex = strict(input).unwrap().to_hex();
            assert_eq!(hex, input.to_lowercase());
        }
    }

    #[test]
    fn test_decode_encode_round_trip() {
        let every_byte: Vec<u8> = (0..=u8::MAX).collect();
        let mut buffers = vec![every_byte];
        for len in [0usize, 1, 2, 7, 16, 33, 255] {
            buffers.push((0..len).map(|i| (i * 37 + len) as u8).collect());
        }
        for bytes in buffers {
            for policy in [DecodePolicy::Strict, DecodePolicy::Lenient] {
                let decoded = decode("test", &encode(&bytes), policy).unwrap();
                assert_eq!(decoded.as_bytes(), bytes.as_slice(), "{policy:?}");
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(strict("").unwrap().is_empty());
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_strict_rejects_odd_length() {
        let err = strict("abc").unwrap_err();
        assert!(matches!(err, RaError::MalformedInput { ref param, .. } if param == "test"));
        assert!(err.to_string().contains("odd"));
    }

    #[test]
    fn test_strict_rejects_non_hex() {
        let err = strict("zz").unwrap_err();
        assert!(err.to_string().contains("'z'"));
        assert!(strict("0g").is_err());
        assert!(strict("1 2 ").is_err());
    }

    #[test]
    fn test_lenient_maps_unknown_to_zero() {
        let buf = decode("k", "-1+f", DecodePolicy::Lenient).unwrap();
        assert_eq!(buf.as_bytes(), &[0x01, 0x0f]);
    }

    #[test]
    fn test_lenient_drops_trailing_digit() {
        let buf = decode("k", "abc", DecodePolicy::Lenient).unwrap();
        assert_eq!(buf.as_bytes(), &[0xab]);
    }

    #[test]
    fn test_lenient_letters_past_f_wrap() {
        // 'z' is 35, so "zz" is 35 * 16 + 35 = 595, which wraps to 0x53.
        let buf = decode("k", "zz", DecodePolicy::Lenient).unwrap();
        assert_eq!(buf.as_bytes(), &[0x53]);
    }

    #[test]
    fn test_parse_decimal_strict() {
        assert_eq!(parse_decimal("v", "17", DecodePolicy::Strict).unwrap(), 17);
        assert_eq!(parse_decimal("v", " 3 ", DecodePolicy::Strict).unwrap(), 3);
        assert!(parse_decimal("v", "x1", DecodePolicy::Strict).is_err());
        assert!(parse_decimal("v", "256", DecodePolicy::Strict).is_err());
        assert!(parse_decimal("v", "", DecodePolicy::Strict).is_err());
    }

    #[test]
    fn test_parse_decimal_lenient_like_atoi() {
        assert_eq!(parse_decimal("v", "abc", DecodePolicy::Lenient).unwrap(), 0);
        assert_eq!(parse_decimal("v", "  12xyz", DecodePolicy::Lenient).unwrap(), 12);
        assert_eq!(parse_decimal("v", "257", DecodePolicy::Lenient).unwrap(), 1);
        assert_eq!(parse_decimal("v", "-1", DecodePolicy::Lenient).unwrap(), 255);
    }

    #[test]
    fn test_buffer_debug_shows_hex() {
        let buf = Buffer::from(&[0x01u8, 0x02][..]);
        assert_eq!(format!("{buf:?}"), "Buffer(0102)");
    }
}

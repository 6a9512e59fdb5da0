//! Textual DUID encodings
//!
//! Canonical output is unpunctuated uppercase hex; display output is
//! colon-separated uppercase hex; input parsing accepts optional `:` or
//! whitespace separators, case-insensitive.

use idshift_core::{Error, Result};

/// Encode bytes as unpunctuated uppercase hex (canonical output form)
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Encode bytes as colon-separated uppercase hex (display form)
pub fn colon_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse hex text into bytes.
///
/// Accepts `:` and whitespace separators anywhere in the input and is
/// case-insensitive, so `"00:03:00:01"`, `"0003 0001"` and `"00030001"`
/// all decode to the same bytes.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    let mut digits = Vec::with_capacity(text.len());
    for c in text.chars() {
        if c == ':' || c.is_whitespace() {
            continue;
        }
        let digit = c
            .to_digit(16)
            .ok_or_else(|| Error::InvalidHex(format!("unexpected character '{}'", c)))?;
        digits.push(digit as u8);
    }

    if digits.is_empty() {
        return Err(Error::InvalidHex("empty input".to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(Error::InvalidHex(format!(
            "odd number of hex digits in '{}'",
            text
        )));
    }

    Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_uppercase_unpunctuated() {
        assert_eq!(to_hex(&[0x00, 0x03, 0xAB, 0xFF]), "0003ABFF");
    }

    #[test]
    fn test_colon_hex() {
        assert_eq!(colon_hex(&[0x00, 0x03, 0xAB]), "00:03:AB");
    }

    #[test]
    fn test_from_hex_separators() {
        let colons = from_hex("00:03:00:01:AA:BB:CC:DD:EE:FF").unwrap();
        let spaced = from_hex("0003000 1AABBCCDDEEFF".replace(' ', "").as_str()).unwrap();
        assert_eq!(colons, spaced);
        assert_eq!(colons, from_hex("0003 0001 aabb ccdd eeff").unwrap());
    }

    #[test]
    fn test_from_hex_case_insensitive() {
        assert_eq!(from_hex("aabb").unwrap(), from_hex("AABB").unwrap());
    }

    #[test]
    fn test_roundtrip() {
        let samples: Vec<Vec<u8>> = vec![
            vec![0x00],
            vec![0x00, 0x01],
            vec![0xDE, 0xAD, 0xBE, 0xEF],
            (0u8..=255).collect(),
        ];
        for bytes in samples {
            assert_eq!(from_hex(&to_hex(&bytes)).unwrap(), bytes);
        }
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(from_hex("").is_err());
        assert!(from_hex("   ").is_err());
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
    }
}

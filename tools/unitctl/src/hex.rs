//! Hex helpers for printing and reading packed unit fields

use anyhow::{bail, Context, Result};
use std::fmt::Write;

/// Encode bytes to a space-separated hex string
/// Example: [0x00, 0x44, 0xAB] -> "00 44 AB"
pub fn encode_bytes(data: &[u8], uppercase: bool) -> String {
    let mut result = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            result.push(' ');
        }
        // Writing to String buffer is infallible
        let _ = if uppercase {
            write!(&mut result, "{:02X}", byte)
        } else {
            write!(&mut result, "{:02x}", byte)
        };
    }
    result
}

/// Format a packed word as `0x` followed by 16 hex digits
pub fn format_word(word: u64, uppercase: bool) -> String {
    if uppercase {
        format!("0x{:016X}", word)
    } else {
        format!("0x{:016x}", word)
    }
}

/// Parse a packed word from user input.
///
/// Accepts an optional `0x` prefix, `_` digit separators and spaces between
/// bytes, e.g. `0x0044000000000000`, `0044_0000_0000_0000`, `00 44 00 00 00 00 00 00`.
pub fn parse_word(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let digits: String = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .collect();

    if digits.is_empty() {
        bail!("Empty unit field: '{}'", input);
    }
    if digits.len() > 16 {
        bail!(
            "Unit field too long: '{}' has {} hex digits (max 16)",
            input,
            digits.len()
        );
    }
    u64::from_str_radix(&digits, 16).with_context(|| format!("Invalid hex unit field: '{}'", input))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_encode_bytes() {
        assert_eq!(encode_bytes(&[0x00, 0x44, 0xAB], true), "00 44 AB");
        assert_eq!(encode_bytes(&[0x00, 0x44, 0xAB], false), "00 44 ab");
        assert_eq!(encode_bytes(&[], true), "");
    }

    #[test]
    fn test_format_word() {
        assert_eq!(format_word(0x44_0000_0000_0000, true), "0x0044000000000000");
        assert_eq!(format_word(0xE << 40, false), "0x00000e0000000000");
    }

    #[test]
    fn test_parse_word_forms() {
        let expected = 0x0044_0000_0000_0000;
        assert_eq!(parse_word("0x0044000000000000").unwrap(), expected);
        assert_eq!(parse_word("0X0044000000000000").unwrap(), expected);
        assert_eq!(parse_word("0044_0000_0000_0000").unwrap(), expected);
        assert_eq!(parse_word("00 44 00 00 00 00 00 00").unwrap(), expected);
        assert_eq!(parse_word("44000000000000").unwrap(), expected);
    }

    #[test]
    fn test_parse_word_rejects_bad_input() {
        assert!(parse_word("").is_err());
        assert!(parse_word("0x").is_err());
        assert!(parse_word("0x00440000000000001").is_err());
        assert!(parse_word("meter").is_err());
    }
}

//! Cleaning of string-formatted numeric cells.
//!
//! The benchmark harness writes some numbers with a unit attached, e.g.
//! `85.5%` or `1024 bytes`. These helpers strip the unit and parse the rest.

use crate::errors::*;
use serde::de::{self, Deserialize, Deserializer};

/// Parses a percentage such as `85.5%`. Every `%` is removed before parsing,
/// so `"85.5%"` and `"85.5"` give the same value.
pub fn parse_percent(s: &str) -> Result<f64> {
    parse_number(&s.replace('%', ""), s)
}

/// Parses a byte count such as `1024 bytes`. The `bytes` unit is matched
/// case-insensitively.
pub fn parse_bytes(s: &str) -> Result<f64> {
    parse_number(&s.to_lowercase().replace("bytes", ""), s)
}

#[inline]
fn parse_number(cleaned: &str, original: &str) -> Result<f64> {
    cleaned
        .trim()
        .parse::<f64>()
        .chain_err(|| ErrorKind::MalformedValue(original.to_string()))
}

/// Deserializes a cell that may carry a `%` suffix.
pub fn de_percent<'de, D>(deserializer: D) -> ::std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_percent(&s).map_err(|e| de::Error::custom(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_suffix_is_ignored() {
        assert_eq!(parse_percent("85.5%").unwrap(), parse_percent("85.5").unwrap());
        assert_eq!(parse_percent(" 42% ").unwrap(), 42.0);
        assert_eq!(parse_percent("0%").unwrap(), 0.0);
    }

    #[test]
    fn bytes_suffix_is_case_insensitive() {
        assert_eq!(parse_bytes("1024 bytes").unwrap(), 1024.0);
        assert_eq!(parse_bytes("1024 BYTES").unwrap(), 1024.0);
        assert_eq!(parse_bytes("1024Bytes").unwrap(), 1024.0);
        assert_eq!(parse_bytes(" 96 ").unwrap(), 96.0);
    }

    #[test]
    fn garbage_is_reported() {
        match parse_percent("n/a%") {
            Err(Error(ErrorKind::MalformedValue(text), _)) => assert_eq!(text, "n/a%"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(parse_bytes("kilobytes").is_err());
        assert!(parse_bytes("").is_err());
    }
}

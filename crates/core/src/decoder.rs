//! Symbol to text conversion.
//!
//! Each estimated symbol is reduced to a hard bit decision: strictly
//! positive means 1, zero or negative means 0. The threshold is fixed.
//! Bits are packed MSB-first into 8-bit groups and every group becomes the
//! character with that code point.
//!
//! # Trailing Bits
//!
//! A symbol count that is not a multiple of 8 leaves an incomplete final
//! group. [`TrailingBits::Drop`] discards it silently (the default);
//! [`TrailingBits::Fail`] reports it as an error.

use crate::bitio::BitWriter;
use crate::error::{DecodeError, Result};
use crate::spreading::Symbol;
use std::fmt;
use std::str::FromStr;

/// Policy for an incomplete final bit group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TrailingBits {
    /// Silently discard the partial group
    #[default]
    Drop,
    /// Reject the symbol stream
    Fail,
}

impl TrailingBits {
    /// Apply the policy to a group of `trailing_bits` leftover bits.
    pub fn resolve(self, trailing_bits: usize) -> Result<()> {
        match self {
            _ if trailing_bits == 0 => Ok(()),
            TrailingBits::Drop => Ok(()),
            TrailingBits::Fail => Err(DecodeError::TruncatedBitGroup { trailing_bits }.into()),
        }
    }
}

impl fmt::Display for TrailingBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailingBits::Drop => write!(f, "drop"),
            TrailingBits::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for TrailingBits {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(TrailingBits::Drop),
            "fail" => Ok(TrailingBits::Fail),
            other => Err(format!("unknown trailing-bits policy: {other} (expected drop or fail)")),
        }
    }
}

/// Hard bit decision for one symbol.
#[inline]
pub fn symbol_to_bit(symbol: Symbol) -> bool {
    symbol > 0
}

/// Threshold every symbol to a bit.
pub fn symbols_to_bits(symbols: &[Symbol]) -> Vec<bool> {
    symbols.iter().map(|&s| symbol_to_bit(s)).collect()
}

/// Decode estimated symbols into text.
///
/// # Errors
/// `DecodeError::TruncatedBitGroup` when `policy` is `Fail` and the symbol
/// count is not a multiple of 8.
pub fn decode(symbols: &[Symbol], policy: TrailingBits) -> Result<String> {
    let mut writer = BitWriter::with_capacity(symbols.len());
    for &symbol in symbols {
        writer.push_bit(symbol_to_bit(symbol));
    }

    policy.resolve(writer.pending_bits())?;

    Ok(writer.into_bytes().into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_decode_single_char() {
        let symbols = [-8, 8, -8, -8, -8, -8, -8, 8];
        assert_eq!(decode(&symbols, TrailingBits::Drop).unwrap(), "A");
    }

    #[test]
    fn test_zero_symbol_is_zero_bit() {
        assert!(!symbol_to_bit(0));
        assert!(symbol_to_bit(1));
        assert!(!symbol_to_bit(-1));

        // 0b00000000 with one zero symbol in the mix
        let symbols = [0, -2, -4, -6, -8, -1, 0, 0];
        assert_eq!(decode(&symbols, TrailingBits::Drop).unwrap(), "\u{0}");
    }

    #[test]
    fn test_magnitude_ignored() {
        let strong = [-8, 8, -8, -8, -8, -8, -8, 8];
        let weak = [-1, 3, -2, -6, 0, -4, -1, 2];
        assert_eq!(
            decode(&strong, TrailingBits::Drop).unwrap(),
            decode(&weak, TrailingBits::Drop).unwrap()
        );
    }

    #[test]
    fn test_trailing_group_dropped() {
        let mut symbols = vec![-8, 8, -8, -8, -8, -8, -8, 8];
        symbols.extend([8, 8, 8]);
        assert_eq!(decode(&symbols, TrailingBits::Drop).unwrap(), "A");
    }

    #[test]
    fn test_trailing_group_fails() {
        let mut symbols = vec![-8, 8, -8, -8, -8, -8, -8, 8];
        symbols.extend([8, 8, 8]);

        let err = decode(&symbols, TrailingBits::Fail).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::TruncatedBitGroup { trailing_bits: 3 })
        ));
    }

    #[test]
    fn test_fail_policy_accepts_whole_groups() {
        let symbols = [-8, 8, -8, -8, -8, -8, -8, 8];
        assert_eq!(decode(&symbols, TrailingBits::Fail).unwrap(), "A");
        assert_eq!(decode(&[], TrailingBits::Fail).unwrap(), "");
    }

    #[test]
    fn test_high_code_points() {
        let symbols = [8; 8];
        assert_eq!(decode(&symbols, TrailingBits::Drop).unwrap(), "\u{FF}");
    }

    #[test]
    fn test_symbols_to_bits() {
        assert_eq!(symbols_to_bits(&[3, 0, -3]), vec![true, false, false]);
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!("drop".parse::<TrailingBits>().unwrap(), TrailingBits::Drop);
        assert_eq!("FAIL".parse::<TrailingBits>().unwrap(), TrailingBits::Fail);
        assert!("pad".parse::<TrailingBits>().is_err());
        assert_eq!(TrailingBits::Fail.to_string(), "fail");
        assert_eq!(TrailingBits::default(), TrailingBits::Drop);
    }
}

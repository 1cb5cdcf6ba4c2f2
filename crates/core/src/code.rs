//! Spreading codes.
//!
//! A [`SpreadingCode`] is a fixed sequence of chips, each -1 or +1. Every
//! station on a channel owns one code; despreading against the right code
//! collapses that station's signal to `±chip_length` per bit, while the
//! other stations' contributions cancel when the codes are orthogonal.
//!
//! Orthogonality is an assumption about input data, not a runtime invariant.
//! [`check_orthogonality`] is offered for callers that want to enforce it,
//! and [`walsh_codes`] generates families that satisfy it exactly.

use crate::error::CodeError;
use std::fmt;

/// An immutable, non-empty sequence of bipolar chips.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpreadingCode {
    chips: Vec<i8>,
}

impl SpreadingCode {
    /// Build a code from chip values.
    ///
    /// # Errors
    /// - `CodeError::Empty` if `chips` is empty
    /// - `CodeError::InvalidChip` if any value is not -1 or +1
    pub fn new(chips: &[i32]) -> Result<Self, CodeError> {
        if chips.is_empty() {
            return Err(CodeError::Empty);
        }

        let chips = chips
            .iter()
            .enumerate()
            .map(|(index, &value)| match value {
                1 => Ok(1),
                -1 => Ok(-1),
                _ => Err(CodeError::InvalidChip { index, value }),
            })
            .collect::<Result<Vec<i8>, _>>()?;

        Ok(Self { chips })
    }

    /// Number of chips per bit.
    pub fn chip_length(&self) -> usize {
        self.chips.len()
    }

    /// Chips in transmission order.
    pub fn chips(&self) -> &[i8] {
        &self.chips
    }

    /// Dot product with another code of the same length.
    ///
    /// Returns `None` when the lengths differ.
    pub fn correlate(&self, other: &SpreadingCode) -> Option<i64> {
        cross_correlation(&self.chips, &other.chips)
    }
}

impl TryFrom<Vec<i32>> for SpreadingCode {
    type Error = CodeError;

    fn try_from(chips: Vec<i32>) -> Result<Self, Self::Error> {
        Self::new(&chips)
    }
}

impl fmt::Display for SpreadingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, chip) in self.chips.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:+}", chip)?;
        }
        write!(f, "]")
    }
}

/// Elementwise product sum of two equal-length chip slices.
pub fn cross_correlation(a: &[i8], b: &[i8]) -> Option<i64> {
    if a.len() != b.len() {
        return None;
    }
    Some(a.iter().zip(b).map(|(&x, &y)| x as i64 * y as i64).sum())
}

/// A pair of codes whose cross-correlation exceeds the tolerance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelatedPair<K> {
    pub first: K,
    pub second: K,
    pub correlation: i64,
}

/// Check every pair of codes for (near-)orthogonality.
///
/// A pair is reported when the absolute value of its cross-correlation is
/// greater than `tolerance`. Pairs of unequal length are skipped; chip length
/// consistency is checked separately when a station table is built.
/// Returns an empty vector when all pairs pass.
pub fn check_orthogonality<'a, K, I>(codes: I, tolerance: u64) -> Vec<CorrelatedPair<K>>
where
    K: Clone + 'a,
    I: IntoIterator<Item = (K, &'a SpreadingCode)>,
{
    let codes: Vec<(K, &SpreadingCode)> = codes.into_iter().collect();
    let mut offending = Vec::new();

    for (i, (first_id, first)) in codes.iter().enumerate() {
        for (second_id, second) in &codes[i + 1..] {
            let Some(correlation) = first.correlate(second) else {
                continue;
            };
            if correlation.unsigned_abs() > tolerance {
                offending.push(CorrelatedPair {
                    first: first_id.clone(),
                    second: second_id.clone(),
                    correlation,
                });
            }
        }
    }

    offending
}

/// Generate the rows of a Walsh-Hadamard matrix of the given order.
///
/// Row `k` is built by Sylvester's construction (see [`walsh_code`]). All
/// rows are mutually orthogonal. Row 0 is all ones and is usually left
/// unassigned, since it offers no spreading.
///
/// # Errors
/// `CodeError::InvalidWalshOrder` unless `order` is a non-zero power of two.
pub fn walsh_codes(order: usize) -> Result<Vec<SpreadingCode>, CodeError> {
    if order == 0 || !order.is_power_of_two() {
        return Err(CodeError::InvalidWalshOrder(order));
    }

    (0..order).map(|row| walsh_code(order, row)).collect()
}

/// Generate a single row of a Walsh-Hadamard matrix without building the
/// rest of it.
///
/// Chip `j` of row `k` is `-1` when the popcount of `j & k` is odd, `+1`
/// otherwise.
///
/// # Errors
/// - `CodeError::InvalidWalshOrder` unless `order` is a non-zero power of two
/// - `CodeError::WalshRowOutOfRange` if `row >= order`
pub fn walsh_code(order: usize, row: usize) -> Result<SpreadingCode, CodeError> {
    if order == 0 || !order.is_power_of_two() {
        return Err(CodeError::InvalidWalshOrder(order));
    }
    if row >= order {
        return Err(CodeError::WalshRowOutOfRange { row, order });
    }

    let chips = (0..order)
        .map(|col| if (row & col).count_ones() % 2 == 1 { -1 } else { 1 })
        .collect();

    Ok(SpreadingCode { chips })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_codes() -> Vec<(&'static str, SpreadingCode)> {
        vec![
            ("A", SpreadingCode::new(&[-1, -1, -1, 1, 1, -1, 1, 1]).unwrap()),
            ("B", SpreadingCode::new(&[-1, -1, 1, -1, 1, 1, 1, -1]).unwrap()),
            ("C", SpreadingCode::new(&[-1, 1, -1, 1, 1, 1, -1, -1]).unwrap()),
            ("D", SpreadingCode::new(&[-1, 1, -1, -1, -1, -1, 1, -1]).unwrap()),
        ]
    }

    #[test]
    fn test_rejects_empty_code() {
        assert_eq!(SpreadingCode::new(&[]), Err(CodeError::Empty));
    }

    #[test]
    fn test_rejects_non_bipolar_chip() {
        let err = SpreadingCode::new(&[1, -1, 0, 1]).unwrap_err();
        assert_eq!(err, CodeError::InvalidChip { index: 2, value: 0 });
    }

    #[test]
    fn test_chip_length() {
        let code = SpreadingCode::try_from(vec![1, -1, 1]).unwrap();
        assert_eq!(code.chip_length(), 3);
        assert_eq!(code.chips(), &[1, -1, 1]);
    }

    #[test]
    fn test_display() {
        let code = SpreadingCode::new(&[1, -1]).unwrap();
        assert_eq!(code.to_string(), "[+1 -1]");
    }

    #[test]
    fn test_self_correlation_is_chip_length() {
        for (_, code) in reference_codes() {
            assert_eq!(code.correlate(&code), Some(8));
        }
    }

    #[test]
    fn test_correlation_length_mismatch() {
        let a = SpreadingCode::new(&[1, 1]).unwrap();
        let b = SpreadingCode::new(&[1, 1, 1]).unwrap();
        assert_eq!(a.correlate(&b), None);
    }

    #[test]
    fn test_reference_codes_are_orthogonal() {
        let codes = reference_codes();
        let offending = check_orthogonality(codes.iter().map(|(id, c)| (*id, c)), 0);
        assert!(offending.is_empty(), "unexpected pairs: {:?}", offending);
    }

    #[test]
    fn test_detects_correlated_pair() {
        let a = SpreadingCode::new(&[1, 1, 1, 1]).unwrap();
        let b = SpreadingCode::new(&[1, 1, 1, -1]).unwrap();
        let c = SpreadingCode::new(&[1, -1, 1, -1]).unwrap();

        let offending = check_orthogonality([("a", &a), ("b", &b), ("c", &c)], 0);

        // a·b = 2, a·c = 0, b·c = 2
        assert_eq!(offending.len(), 2);
        assert_eq!(offending[0].first, "a");
        assert_eq!(offending[0].second, "b");
        assert_eq!(offending[0].correlation, 2);

        // Raising the tolerance accepts near-orthogonal pairs.
        assert!(check_orthogonality([("a", &a), ("b", &b), ("c", &c)], 2).is_empty());
    }

    #[test]
    fn test_walsh_codes_orthogonal() {
        for order in [1, 2, 4, 8, 16, 64] {
            let codes = walsh_codes(order).unwrap();
            assert_eq!(codes.len(), order);
            assert!(codes.iter().all(|c| c.chip_length() == order));
            assert!(check_orthogonality(codes.iter().enumerate(), 0).is_empty());
        }
    }

    #[test]
    fn test_walsh_first_row_all_ones() {
        let codes = walsh_codes(4).unwrap();
        assert_eq!(codes[0].chips(), &[1, 1, 1, 1]);
        assert_eq!(codes[1].chips(), &[1, -1, 1, -1]);
        assert_eq!(codes[3].chips(), &[1, -1, -1, 1]);
    }

    #[test]
    fn test_walsh_invalid_order() {
        assert_eq!(walsh_codes(0), Err(CodeError::InvalidWalshOrder(0)));
        assert_eq!(walsh_codes(6), Err(CodeError::InvalidWalshOrder(6)));
    }

    #[test]
    fn test_walsh_single_row_matches_matrix() {
        let codes = walsh_codes(16).unwrap();
        for (row, code) in codes.iter().enumerate() {
            assert_eq!(&walsh_code(16, row).unwrap(), code);
        }

        // A single row of a large order stays cheap to build.
        let row = walsh_code(1 << 16, 3).unwrap();
        assert_eq!(row.chip_length(), 1 << 16);
        assert_eq!(&row.chips()[..4], &[1, -1, -1, 1]);
    }

    #[test]
    fn test_walsh_row_out_of_range() {
        assert_eq!(
            walsh_code(4, 4),
            Err(CodeError::WalshRowOutOfRange { row: 4, order: 4 })
        );
        assert_eq!(walsh_code(3, 1), Err(CodeError::InvalidWalshOrder(3)));
    }
}

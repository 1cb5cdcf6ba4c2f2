//! Message to bipolar bit conversion.
//!
//! Each character becomes 8 bipolar values, most significant bit first:
//! a one bit is sent as +1 and a zero bit as -1. Characters must have code
//! points in `0..=255`; anything wider is rejected rather than truncated.

use crate::bitio::{bit_to_bipolar, BitReader, BITS_PER_CHAR};
use crate::error::{EncodeError, Error, Result};

/// Bipolar bit values (+1 / -1), 8 per source character.
pub type BitSequence = Vec<i8>;

/// Convert message text to single-byte character values.
///
/// # Errors
/// `EncodeError::CharacterOutOfRange` for the first character above U+00FF.
pub fn message_to_bytes(message: &str) -> Result<Vec<u8>> {
    message
        .chars()
        .enumerate()
        .map(|(position, character)| {
            u8::try_from(character).map_err(|_| {
                Error::from(EncodeError::CharacterOutOfRange {
                    character,
                    code_point: character as u32,
                    position,
                })
            })
        })
        .collect()
}

/// Encode a message into its bipolar bit sequence.
///
/// # Errors
/// `EncodeError::CharacterOutOfRange` if any character does not fit in 8 bits.
pub fn encode(message: &str) -> Result<BitSequence> {
    let bytes = message_to_bytes(message)?;
    let mut bits = Vec::with_capacity(bytes.len() * BITS_PER_CHAR);
    bits.extend(BitReader::new(&bytes).map(bit_to_bipolar));
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_single_char() {
        // 'A' = 65 = 0b01000001
        let bits = encode("A").unwrap();
        assert_eq!(bits, vec![-1, 1, -1, -1, -1, -1, -1, 1]);
    }

    #[test]
    fn test_encode_length() {
        let bits = encode("GOD").unwrap();
        assert_eq!(bits.len(), 24);
        assert!(bits.iter().all(|&b| b == 1 || b == -1));
    }

    #[test]
    fn test_encode_empty() {
        assert!(encode("").unwrap().is_empty());
    }

    #[test]
    fn test_encode_extremes() {
        let bits = encode("\u{0}\u{FF}").unwrap();
        assert_eq!(&bits[..8], &[-1; 8]);
        assert_eq!(&bits[8..], &[1; 8]);
    }

    #[test]
    fn test_latin1_character_accepted() {
        // 'é' = U+00E9 = 0b11101001
        let bits = encode("é").unwrap();
        assert_eq!(bits, vec![1, 1, 1, -1, 1, -1, -1, 1]);
    }

    #[test]
    fn test_wide_character_rejected() {
        let err = encode("ab€").unwrap_err();
        match err {
            Error::Encode(EncodeError::CharacterOutOfRange {
                character,
                code_point,
                position,
            }) => {
                assert_eq!(character, '€');
                assert_eq!(code_point, 0x20AC);
                assert_eq!(position, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

//! Message generation for testing.
//!
//! When random messages are requested, every station gets a string of
//! printable ASCII drawn from a seeded ChaCha8 stream, so a run can be
//! repeated exactly with the same seed.
//!
//! # Design
//!
//! Generated text mixes three character classes:
//! - Upper-case letters (like the reference call signs)
//! - Lower-case letters and digits
//! - Punctuation and spaces
//!
//! All of it stays inside the single-byte range the encoder accepts.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const PUNCT: &[u8] = b" .,!?-:;'";

/// Generate one message per station, each `len` characters long.
///
/// All messages share the same length, which the shared channel requires.
pub fn generate_messages(seed: u64, count: usize, len: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| generate_message(&mut rng, len)).collect()
}

/// Generate a single printable message.
fn generate_message(rng: &mut ChaCha8Rng, len: usize) -> String {
    (0..len)
        .map(|_| {
            let class: u8 = rng.gen_range(0..10);
            let alphabet = match class {
                // 50% upper case
                0..=4 => UPPER,
                // 30% lower case and digits
                5..=7 => LOWER,
                // 20% punctuation
                _ => PUNCT,
            };
            char::from(alphabet[rng.gen_range(0..alphabet.len())])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_messages() {
        let messages = generate_messages(42, 4, 3);
        assert_eq!(messages.len(), 4);
        assert!(messages.iter().all(|m| m.chars().count() == 3));
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate_messages(12345, 8, 16), generate_messages(12345, 8, 16));
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(generate_messages(1, 4, 32), generate_messages(2, 4, 32));
    }

    #[test]
    fn test_printable_ascii() {
        for message in generate_messages(999, 16, 64) {
            assert!(message.bytes().all(|b| (b' '..=b'~').contains(&b)));
        }
    }

    #[test]
    fn test_various_sizes() {
        for len in [0, 1, 10, 100] {
            let messages = generate_messages(7, 2, len);
            assert!(messages.iter().all(|m| m.len() == len));
        }
    }
}

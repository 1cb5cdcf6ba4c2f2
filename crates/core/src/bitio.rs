//! Bit-level conversions between characters and bipolar values.
//!
//! The channel works on bipolar symbols (+1 for a one bit, -1 for a zero
//! bit), while messages are stored as 8-bit characters. [`BitWriter`] packs
//! hard bit decisions back into bytes and [`BitReader`] walks the bits of a
//! byte buffer. Both operate MSB-first.
//!
//! # Partial Bytes
//! - BitWriter: keeps an incomplete trailing byte separate from the finished
//!   bytes, so callers decide whether to drop it or reject it
//! - BitReader: only ever yields whole bytes' worth of bits
//!
//! # Example
//! ```
//! use cdma_sim_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! for bit in [false, true, false, false, false, false, false, true] {
//!     writer.push_bit(bit);
//! }
//! assert_eq!(writer.bytes(), b"A");
//!
//! let mut reader = BitReader::new(b"A");
//! assert_eq!(reader.read_bit(), Some(false));
//! assert_eq!(reader.read_bit(), Some(true));
//! ```

/// Number of bits carried by one character.
pub const BITS_PER_CHAR: usize = 8;

/// Map a bit to its bipolar value.
#[inline]
pub fn bit_to_bipolar(bit: bool) -> i8 {
    if bit {
        1
    } else {
        -1
    }
}

/// Packs bits MSB-first into bytes.
///
/// # Invariants
/// - `pending` holds fewer than 8 bits
/// - `pending_count` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (LSB-aligned)
    pending: u8,
    /// Number of bits in `pending` (0-7)
    pending_count: usize,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits / BITS_PER_CHAR),
            pending: 0,
            pending_count: 0,
        }
    }

    /// Append one bit. A byte is completed every eighth call.
    pub fn push_bit(&mut self, bit: bool) {
        self.pending = (self.pending << 1) | bit as u8;
        self.pending_count += 1;

        if self.pending_count == BITS_PER_CHAR {
            self.bytes.push(self.pending);
            self.pending = 0;
            self.pending_count = 0;
        }
    }

    /// Completed bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bits waiting in the incomplete trailing byte.
    pub fn pending_bits(&self) -> usize {
        self.pending_count
    }

    /// Return the total number of bits written (including the partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * BITS_PER_CHAR + self.pending_count
    }

    /// Consume the writer, returning only the completed bytes.
    ///
    /// Any pending partial byte is discarded.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader for the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read a single bit, or `None` at the end of the buffer.
    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.bit_position / BITS_PER_CHAR)?;
        let shift = BITS_PER_CHAR - 1 - self.bit_position % BITS_PER_CHAR;
        self.bit_position += 1;
        Some((byte >> shift) & 1 == 1)
    }

    /// Return the number of bits remaining in the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * BITS_PER_CHAR - self.bit_position
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits_remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitReader<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_single_byte() {
        let mut writer = BitWriter::new();
        for bit in [true, false, true, true, false, false, true, true] {
            writer.push_bit(bit);
        }

        assert_eq!(writer.bytes(), &[0b10110011]);
        assert_eq!(writer.pending_bits(), 0);
    }

    #[test]
    fn test_pending_bits_not_flushed() {
        let mut writer = BitWriter::new();
        for _ in 0..11 {
            writer.push_bit(true);
        }

        assert_eq!(writer.bytes(), &[0xFF]);
        assert_eq!(writer.pending_bits(), 3);
        assert_eq!(writer.bit_len(), 11);
        assert_eq!(writer.into_bytes(), vec![0xFF]);
    }

    #[test]
    fn test_read_msb_first() {
        let data = [0b10000001u8];
        let bits: Vec<bool> = BitReader::new(&data).collect();

        assert_eq!(
            bits,
            vec![true, false, false, false, false, false, false, true]
        );
    }

    #[test]
    fn test_read_past_end() {
        let data = [0xAA];
        let mut reader = BitReader::new(&data);

        for _ in 0..8 {
            assert!(reader.read_bit().is_some());
        }
        assert!(reader.is_empty());
        assert_eq!(reader.read_bit(), None);
    }

    #[test]
    fn test_bits_remaining() {
        let data = [0xFF, 0x00];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.bits_remaining(), 16);
        assert_eq!(reader.len(), 16);
        let _ = reader.nth(4);
        assert_eq!(reader.bits_remaining(), 11);
    }

    #[test]
    fn test_reader_feeds_writer() {
        let data = b"CDMA";
        let mut writer = BitWriter::with_capacity(data.len() * BITS_PER_CHAR);
        for bit in BitReader::new(data) {
            writer.push_bit(bit);
        }

        assert_eq!(writer.into_bytes(), data.to_vec());
    }

    #[test]
    fn test_bipolar_mapping() {
        assert_eq!(bit_to_bipolar(true), 1);
        assert_eq!(bit_to_bipolar(false), -1);
    }
}

//! Spreading and despreading.
//!
//! Spreading replaces each bipolar bit with a block of `chip_length` chips:
//! the bit value times every chip of the station's code. Despreading undoes
//! this by correlating each block of a received signal with the same code.
//!
//! ```text
//! bit:      -1
//! code:     [-1 -1 -1 +1 +1 -1 +1 +1]
//! chips:    [+1 +1 +1 -1 -1 +1 -1 -1]
//! despread: sum(chips * code) = -8
//! ```
//!
//! On a shared channel the received block is the sum of every station's
//! chips. Correlating with one station's code yields `±chip_length` for that
//! station plus the cross-correlation of the others, which is zero for
//! orthogonal codes. Only the sign of the result is used downstream.

use crate::code::SpreadingCode;
use crate::error::{ChannelError, Result};

/// One chip value on the channel. A single station emits only -1 or +1;
/// a combined signal holds sums of those.
pub type Chip = i32;

/// Spread chips for one station, `chip_length` per bit.
pub type ChipSequence = Vec<Chip>;

/// Correlation result for one bit period. The sign carries the bit.
pub type Symbol = i32;

/// Spread bipolar bits with a station's code.
///
/// Output length is `bits.len() * code.chip_length()`; block `k` holds
/// `bits[k] * code[i]` for every chip `i` in code order.
pub fn spread(bits: &[i8], code: &SpreadingCode) -> ChipSequence {
    let mut chips = Vec::with_capacity(bits.len() * code.chip_length());

    for &bit in bits {
        chips.extend(code.chips().iter().map(|&c| Chip::from(bit) * Chip::from(c)));
    }

    chips
}

/// Correlate a signal against a code, one symbol per chip block.
///
/// # Errors
/// `ChannelError::PartialBlock` if the signal length is not a multiple of
/// the code's chip length.
pub fn despread(signal: &[Chip], code: &SpreadingCode) -> Result<Vec<Symbol>> {
    let chip_length = code.chip_length();

    if signal.len() % chip_length != 0 {
        return Err(ChannelError::PartialBlock {
            signal_len: signal.len(),
            chip_length,
        }
        .into());
    }

    let symbols = signal
        .chunks_exact(chip_length)
        .map(|block| {
            block
                .iter()
                .zip(code.chips())
                .map(|(&s, &c)| s * Chip::from(c))
                .sum::<Symbol>()
        })
        .collect();

    Ok(symbols)
}

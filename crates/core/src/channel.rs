//! Shared channel model.
//!
//! Every station transmits at the same time on one medium. The received
//! signal is the linear superposition of all transmissions: an elementwise
//! sum of equal-length chip sequences. There is no attenuation, noise or
//! delay; chip boundaries of all stations are aligned.
//!
//! The combined signal is immutable once produced and can be read by any
//! number of receivers.

use crate::error::{ChannelError, Result};
use crate::spreading::Chip;
use log::debug;
use std::ops::Deref;

/// Elementwise sum of every transmitting station's chips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedSignal {
    samples: Vec<Chip>,
    transmitters: usize,
}

impl CombinedSignal {
    /// Number of chip sequences summed into this signal.
    pub fn transmitters(&self) -> usize {
        self.transmitters
    }

    /// Combined chip values in time order.
    pub fn samples(&self) -> &[Chip] {
        &self.samples
    }

    /// Largest absolute amplitude on the channel.
    ///
    /// Bounded by the number of transmitters.
    pub fn peak_amplitude(&self) -> Chip {
        self.samples.iter().map(|s| s.abs()).max().unwrap_or(0)
    }

    /// Consume the signal, returning the raw samples.
    pub fn into_samples(self) -> Vec<Chip> {
        self.samples
    }
}

impl Deref for CombinedSignal {
    type Target = [Chip];

    fn deref(&self) -> &[Chip] {
        &self.samples
    }
}

/// Sum chip sequences position by position.
///
/// An empty collection yields an empty signal with no transmitters.
///
/// # Errors
/// `ChannelError::LengthMismatch` if any sequence differs in length from
/// the first one.
pub fn combine<I, S>(sequences: I) -> Result<CombinedSignal>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[Chip]>,
{
    let mut sequences = sequences.into_iter();

    let Some(first) = sequences.next() else {
        return Ok(CombinedSignal::default());
    };
    let mut samples = first.as_ref().to_vec();
    let expected = samples.len();
    let mut transmitters = 1;

    for (offset, sequence) in sequences.enumerate() {
        let sequence = sequence.as_ref();
        if sequence.len() != expected {
            return Err(ChannelError::LengthMismatch {
                index: offset + 1,
                expected,
                actual: sequence.len(),
            }
            .into());
        }

        for (acc, &chip) in samples.iter_mut().zip(sequence) {
            *acc += chip;
        }
        transmitters += 1;
    }

    debug!(
        "combined {} transmitters into {} chips",
        transmitters, expected
    );

    Ok(CombinedSignal {
        samples,
        transmitters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_combine_sums_elementwise() {
        let a = vec![1, -1, 1, -1];
        let b = vec![1, 1, -1, -1];
        let c = vec![-1, 1, 1, 1];

        let signal = combine([&a, &b, &c]).unwrap();
        assert_eq!(signal.samples(), &[1, 1, 1, -1]);
        assert_eq!(signal.transmitters(), 3);
    }

    #[test]
    fn test_combine_single_sequence_is_identity() {
        let a = vec![1, -1, -1, 1];
        let signal = combine([a.clone()]).unwrap();
        assert_eq!(signal.into_samples(), a);
    }

    #[test]
    fn test_combine_empty() {
        let signal = combine(Vec::<Vec<Chip>>::new()).unwrap();
        assert!(signal.is_empty());
        assert_eq!(signal.transmitters(), 0);
        assert_eq!(signal.peak_amplitude(), 0);
    }

    #[test]
    fn test_combine_length_mismatch() {
        let a = vec![1, -1, 1, -1];
        let b = vec![1, 1, -1, -1];
        let short = vec![1, 1];

        let err = combine([&a, &b, &short]).unwrap_err();
        assert!(matches!(
            err,
            Error::Channel(ChannelError::LengthMismatch {
                index: 2,
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_peak_amplitude() {
        let signal = combine([vec![1, -1, 1], vec![1, -1, -1], vec![1, -1, 1]]).unwrap();
        assert_eq!(signal.samples(), &[3, -3, 1]);
        assert_eq!(signal.peak_amplitude(), 3);
    }

    #[test]
    fn test_deref_to_slice() {
        let signal = combine([vec![1, 1], vec![1, -1]]).unwrap();
        assert_eq!(signal.len(), 2);
        assert_eq!(&signal[..], &[2, 0]);
    }
}

//! End-to-end channel simulation.
//!
//! A run has three phases and no other state:
//!
//! 1. **Encode-all**: every station encodes its message and spreads it with
//!    its own code.
//! 2. **Combine**: all chip sequences are summed onto the shared channel.
//! 3. **Decode-all**: every station despreads the combined signal with its
//!    own code and decodes the symbols.
//!
//! No receiver ever sees another station's plaintext, only the combined
//! signal. A station whose message cannot be encoded stays off the channel
//! and is reported as failed; the remaining stations run normally.
//!
//! # Example
//! ```
//! use cdma_sim_core::code::SpreadingCode;
//! use cdma_sim_core::simulation::Simulation;
//! use cdma_sim_core::station::{StationId, StationTable};
//!
//! let mut table = StationTable::new();
//! table.insert(StationId::new("A")?, SpreadingCode::new(&[1, 1, -1, -1])?, "hi")?;
//! table.insert(StationId::new("B")?, SpreadingCode::new(&[1, -1, 1, -1])?, "yo")?;
//!
//! let report = Simulation::new(table).run()?;
//! assert_eq!(report.recovered(&StationId::new("A")?), Some("hi"));
//! assert_eq!(report.recovered(&StationId::new("B")?), Some("yo"));
//! # Ok::<(), cdma_sim_core::Error>(())
//! ```

use crate::channel::{combine, CombinedSignal};
use crate::code::SpreadingCode;
use crate::decoder::{decode, TrailingBits};
use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::metrics::Metrics;
use crate::spreading::{despread, spread, ChipSequence};
use crate::station::{StationId, StationTable};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Encode and spread one message.
pub fn transmit(message: &str, code: &SpreadingCode) -> Result<ChipSequence> {
    let bits = encode(message)?;
    Ok(spread(&bits, code))
}

/// Despread a received signal with one code and decode the text.
pub fn receive(signal: &[i32], code: &SpreadingCode, policy: TrailingBits) -> Result<String> {
    let symbols = despread(signal, code)?;
    decode(&symbols, policy)
}

/// What happened to one station during a run.
#[derive(Debug)]
pub struct StationOutcome {
    /// Message the station sent
    pub source: String,

    /// Recovered text, or the error that stopped this station
    pub result: std::result::Result<String, Error>,

    /// Bit errors between source and recovered text (when both exist)
    pub bit_errors: Option<u64>,
}

impl StationOutcome {
    /// Recovered text, if the station completed both phases.
    pub fn recovered(&self) -> Option<&str> {
        self.result.as_deref().ok()
    }

    /// Whether the recovered text equals the source.
    pub fn is_intact(&self) -> bool {
        self.recovered() == Some(self.source.as_str())
    }
}

/// Results of a complete run.
#[derive(Debug)]
pub struct SimulationReport {
    /// Per-station outcomes, in station order
    pub outcomes: BTreeMap<StationId, StationOutcome>,

    /// The shared channel signal
    pub signal: CombinedSignal,

    /// Run statistics
    pub metrics: Metrics,
}

impl SimulationReport {
    /// Recovered text for one station.
    pub fn recovered(&self, id: &StationId) -> Option<&str> {
        self.outcomes.get(id).and_then(StationOutcome::recovered)
    }

    /// Whether every station recovered its message intact.
    pub fn all_intact(&self) -> bool {
        self.outcomes.values().all(StationOutcome::is_intact)
    }
}

/// A configured channel simulation.
///
/// Holds only immutable inputs; [`Simulation::run`] can be called repeatedly
/// and from several threads at once.
#[derive(Debug, Clone)]
pub struct Simulation {
    table: StationTable,
    trailing_bits: TrailingBits,
    orthogonality_tolerance: Option<u64>,
}

impl Simulation {
    /// Create a simulation over a station table with default settings.
    pub fn new(table: StationTable) -> Self {
        Self {
            table,
            trailing_bits: TrailingBits::default(),
            orthogonality_tolerance: None,
        }
    }

    /// Set the policy for incomplete trailing bit groups.
    pub fn with_trailing_bits(mut self, policy: TrailingBits) -> Self {
        self.trailing_bits = policy;
        self
    }

    /// Refuse to run unless every pair of codes correlates within `tolerance`.
    pub fn with_orthogonality_check(mut self, tolerance: u64) -> Self {
        self.orthogonality_tolerance = Some(tolerance);
        self
    }

    pub fn table(&self) -> &StationTable {
        &self.table
    }

    pub fn trailing_bits(&self) -> TrailingBits {
        self.trailing_bits
    }

    /// Run encode-all, combine, decode-all.
    ///
    /// # Errors
    /// - `CodeError::NotOrthogonal` if an orthogonality check was requested
    ///   and fails
    /// - `ChannelError::LengthMismatch` if the transmitting stations' chip
    ///   sequences differ in length (unequal message lengths)
    ///
    /// A station whose message fails to encode is reported in its outcome
    /// instead. Decoding a station cannot fail here: every transmission is
    /// a whole number of 8-bit characters spread over the table's shared
    /// chip length, so the combined signal always splits into complete
    /// blocks and complete bit groups, whatever the trailing-bit policy.
    pub fn run(&self) -> Result<SimulationReport> {
        let mut metrics = Metrics::new();
        metrics.stations = self.table.len() as u64;
        metrics.chip_length = self.table.chip_length().unwrap_or(0) as u64;

        match self.orthogonality_tolerance {
            Some(tolerance) => self.table.ensure_orthogonal(tolerance)?,
            None => {
                for pair in self.table.correlated_pairs(0) {
                    warn!(
                        "codes for {} and {} are not orthogonal (correlation {})",
                        pair.first, pair.second, pair.correlation
                    );
                }
            }
        }

        let mut outcomes = BTreeMap::new();
        let mut transmissions: BTreeMap<&StationId, ChipSequence> = BTreeMap::new();

        // Encode-all
        for (id, station) in self.table.iter() {
            match transmit(&station.message, &station.code) {
                Ok(chips) => {
                    debug!("station {} spread {:?} into {} chips", id, station.message, chips.len());
                    metrics.characters_sent += station.message.chars().count() as u64;
                    metrics.bits_encoded += (chips.len() / station.code.chip_length()) as u64;
                    metrics.chips_spread += chips.len() as u64;
                    transmissions.insert(id, chips);
                }
                Err(err) => {
                    warn!("station {} stays off the channel: {}", id, err);
                    metrics.stations_failed_encode += 1;
                    outcomes.insert(
                        id.clone(),
                        StationOutcome {
                            source: station.message.clone(),
                            result: Err(err),
                            bit_errors: None,
                        },
                    );
                }
            }
        }

        // Combine
        let signal = combine(transmissions.values())?;
        metrics.channel_chips = signal.len() as u64;
        metrics.peak_amplitude = signal.peak_amplitude().unsigned_abs() as u64;

        // Decode-all
        for (id, station) in self.table.iter() {
            if !transmissions.contains_key(id) {
                continue;
            }

            let result = receive(&signal, &station.code, self.trailing_bits);
            metrics.symbols_despread += (signal.len() / station.code.chip_length()) as u64;

            let bit_errors = match &result {
                Ok(text) => {
                    metrics.characters_recovered += text.chars().count() as u64;
                    let sent: Vec<u8> = station.message.chars().map(|c| c as u8).collect();
                    let recovered: Vec<u8> = text.chars().map(|c| c as u8).collect();
                    Some(metrics.record_bit_errors(&sent, &recovered))
                }
                Err(err) => {
                    warn!("station {} failed to decode: {}", id, err);
                    None
                }
            };

            let outcome = StationOutcome {
                source: station.message.clone(),
                result,
                bit_errors,
            };
            if outcome.is_intact() {
                metrics.stations_recovered += 1;
            }
            debug!("station {} recovered {:?}", id, outcome.recovered());
            outcomes.insert(id.clone(), outcome);
        }

        metrics.complete();
        info!(
            "simulated {} stations over {} chips: {} intact",
            metrics.stations, metrics.channel_chips, metrics.stations_recovered
        );

        Ok(SimulationReport {
            outcomes,
            signal,
            metrics,
        })
    }
}

//! Metrics collection and reporting for simulation runs.
//!
//! This module provides observable insights into a run:
//! - Station counts (transmitting, failed, recovered intact)
//! - Volume at each stage (characters, bits, chips, symbols)
//! - Recovery quality (bit errors, bit error rate)
//! - Timing information
//!
//! # Design
//!
//! Metrics are collected in a plain struct with explicit updates at each
//! pipeline stage. A run is single-threaded, so no synchronization is needed;
//! independent runs each own their own `Metrics`.

use std::time::{Duration, Instant};

/// Counters and timing for one simulation run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Stations ===
    /// Stations in the table
    pub stations: u64,

    /// Stations whose message could not be encoded
    pub stations_failed_encode: u64,

    /// Stations whose recovered text equals the source
    pub stations_recovered: u64,

    // === Encoding ===
    /// Source characters across all transmitting stations
    pub characters_sent: u64,

    /// Bipolar bits produced by the encoder
    pub bits_encoded: u64,

    /// Chips produced by all spreaders
    pub chips_spread: u64,

    // === Channel ===
    /// Chip length of the codes on the channel
    pub chip_length: u64,

    /// Length of the combined signal
    pub channel_chips: u64,

    /// Largest absolute amplitude on the channel
    pub peak_amplitude: u64,

    // === Decoding ===
    /// Symbols produced by all despreaders
    pub symbols_despread: u64,

    /// Characters recovered across all stations
    pub characters_recovered: u64,

    /// Bits that differ between source and recovered text
    pub bit_errors: u64,

    /// Bits compared when counting errors
    pub bits_compared: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            stations: 0,
            stations_failed_encode: 0,
            stations_recovered: 0,
            characters_sent: 0,
            bits_encoded: 0,
            chips_spread: 0,
            chip_length: 0,
            channel_chips: 0,
            peak_amplitude: 0,
            symbols_despread: 0,
            characters_recovered: 0,
            bit_errors: 0,
            bits_compared: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Fraction of compared bits that were recovered wrongly.
    ///
    /// Returns 0.0 if nothing was compared.
    pub fn bit_error_rate(&self) -> f64 {
        if self.bits_compared == 0 {
            0.0
        } else {
            self.bit_errors as f64 / self.bits_compared as f64
        }
    }

    /// Stations that transmitted onto the channel.
    pub fn stations_transmitting(&self) -> u64 {
        self.stations - self.stations_failed_encode
    }

    /// Whether every station recovered its message intact.
    pub fn all_recovered(&self) -> bool {
        self.stations_recovered == self.stations
    }

    /// Record the bit errors between one station's source and recovered bytes.
    pub fn record_bit_errors(&mut self, sent: &[u8], recovered: &[u8]) -> u64 {
        let errors = count_bit_errors(sent, recovered);
        self.bit_errors += errors;
        self.bits_compared += (sent.len().max(recovered.len()) * 8) as u64;
        errors
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Simulation Summary ===");
        println!("Duration: {} µs", self.duration().as_micros());
        println!();

        println!("=== Stations ===");
        println!("Stations: {}", self.stations);
        println!("Transmitting: {}", self.stations_transmitting());
        println!("Encode failures: {}", self.stations_failed_encode);
        println!("Recovered intact: {}", self.stations_recovered);
        println!();

        println!("=== Channel ===");
        println!("Characters sent: {}", self.characters_sent);
        println!("Bits encoded: {}", self.bits_encoded);
        println!("Chip length: {}", self.chip_length);
        println!("Chips spread: {}", self.chips_spread);
        println!("Channel chips: {}", self.channel_chips);
        println!("Peak amplitude: {}", self.peak_amplitude);
        println!();

        println!("=== Recovery ===");
        println!("Symbols despread: {}", self.symbols_despread);
        println!("Characters recovered: {}", self.characters_recovered);
        println!(
            "Bit errors: {} / {} (BER {:.4})",
            self.bit_errors,
            self.bits_compared,
            self.bit_error_rate()
        );
        println!();
    }

    /// Print just the final result (pass/fail).
    pub fn print_result(&self) {
        if self.all_recovered() {
            println!("✓ All {} stations recovered their messages", self.stations);
        } else if self.stations_failed_encode > 0 {
            println!(
                "✗ Simulation incomplete: {} stations could not encode their messages",
                self.stations_failed_encode
            );
        } else {
            println!(
                "✗ {} of {} stations recovered corrupted text ({} bit errors)",
                self.stations - self.stations_recovered,
                self.stations,
                self.bit_errors
            );
        }
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_us={}\n\
             stations={}\n\
             stations_failed_encode={}\n\
             stations_recovered={}\n\
             bits_encoded={}\n\
             chip_length={}\n\
             channel_chips={}\n\
             peak_amplitude={}\n\
             bit_errors={}\n\
             bit_error_rate={:.4}\n",
            self.duration().as_micros(),
            self.stations,
            self.stations_failed_encode,
            self.stations_recovered,
            self.bits_encoded,
            self.chip_length,
            self.channel_chips,
            self.peak_amplitude,
            self.bit_errors,
            self.bit_error_rate(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Count differing bits between two byte strings.
///
/// Bytes present in only one of them count as fully wrong.
pub fn count_bit_errors(sent: &[u8], recovered: &[u8]) -> u64 {
    let common: u64 = sent
        .iter()
        .zip(recovered)
        .map(|(a, b)| (a ^ b).count_ones() as u64)
        .sum();
    let missing = sent.len().abs_diff(recovered.len()) as u64 * 8;
    common + missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.end_time.is_none());
        assert!(metrics.duration().as_millis() < 100); // Should be recent
    }

    #[test]
    fn test_bit_error_rate() {
        let mut metrics = Metrics::new();
        assert_eq!(metrics.bit_error_rate(), 0.0);

        metrics.bits_compared = 200;
        metrics.bit_errors = 5;
        assert_eq!(metrics.bit_error_rate(), 0.025);
    }

    #[test]
    fn test_count_bit_errors() {
        assert_eq!(count_bit_errors(b"GOD", b"GOD"), 0);
        // 'A' = 0x41, 'C' = 0x43
        assert_eq!(count_bit_errors(b"A", b"C"), 1);
        assert_eq!(count_bit_errors(b"AB", b"A"), 8);
        assert_eq!(count_bit_errors(b"", b"\xFF"), 8);
    }

    #[test]
    fn test_record_bit_errors() {
        let mut metrics = Metrics::new();
        assert_eq!(metrics.record_bit_errors(b"A", b"C"), 1);
        assert_eq!(metrics.record_bit_errors(b"CAT", b"CAT"), 0);

        assert_eq!(metrics.bit_errors, 1);
        assert_eq!(metrics.bits_compared, 32);
    }

    #[test]
    fn test_station_accounting() {
        let mut metrics = Metrics::new();
        metrics.stations = 4;
        metrics.stations_failed_encode = 1;
        metrics.stations_recovered = 3;

        assert_eq!(metrics.stations_transmitting(), 3);
        assert!(!metrics.all_recovered());

        metrics.stations_recovered = 4;
        assert!(metrics.all_recovered());
    }

    #[test]
    fn test_complete() {
        let mut metrics = Metrics::new();
        metrics.complete();
        let first = metrics.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(metrics.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new();
        metrics.stations = 4;
        metrics.chip_length = 8;
        metrics.bit_errors = 0;

        let text = metrics.export_text();
        assert!(text.contains("stations=4"));
        assert!(text.contains("chip_length=8"));
        assert!(text.contains("bit_error_rate=0.0000"));
    }
}

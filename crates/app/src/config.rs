//! Configuration for the cdma-sim application.
//!
//! Handles parsing command-line arguments and resolving them into a complete
//! run configuration.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: it then runs the reference
//! four-station scenario. Anything random is driven by one seed, and the
//! resolved settings can be printed so runs are reproducible.

use crate::input_gen::generate_messages;
use crate::scenario::{Scenario, StationEntry};
use anyhow::{bail, Context};
use cdma_sim_core::code::walsh_code;
use cdma_sim_core::decoder::TrailingBits;
use cdma_sim_core::station::StationTable;
use clap::Parser;
use std::path::PathBuf;

/// Default message length for generated stations.
const DEFAULT_MESSAGE_LEN: usize = 3;

/// Largest Walsh-Hadamard order `--walsh` may generate (1023 stations).
///
/// Every station transmits `order` chips per bit, so channel memory grows
/// with the square of the order.
const MAX_WALSH_ORDER: usize = 1024;

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "cdma-sim", version, about = "Direct-sequence CDMA channel simulator")]
pub struct Cli {
    /// Scenario TOML file (default: built-in four-station reference)
    #[arg(long, conflicts_with = "walsh")]
    pub scenario: Option<PathBuf>,

    /// Use N stations with generated Walsh-Hadamard codes
    #[arg(long, value_name = "STATIONS")]
    pub walsh: Option<usize>,

    /// Replace every message with random printable text of this length
    #[arg(long, value_name = "LEN")]
    pub random_messages: Option<usize>,

    /// Random seed for determinism
    #[arg(long, env = "CDMA_SIM_SEED")]
    pub seed: Option<u64>,

    /// Policy for an incomplete trailing bit group: drop or fail
    #[arg(long)]
    pub trailing: Option<TrailingBits>,

    /// Refuse to run with codes that are not orthogonal
    #[arg(long)]
    pub require_orthogonal: bool,

    /// Largest accepted |cross-correlation| with --require-orthogonal
    #[arg(long, default_value_t = 0, requires = "require_orthogonal")]
    pub tolerance: u64,

    /// Print the combined channel signal
    #[arg(long)]
    pub show_signal: bool,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print metrics summary
    #[arg(long)]
    pub no_metrics: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where the stations come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationSource {
    /// Built-in four-station scenario
    Reference,
    /// Stations read from a TOML file
    File(PathBuf),
    /// `stations` Walsh-Hadamard codes of the given order
    Walsh { stations: usize, order: usize },
}

/// Complete configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Stations ===
    /// Station table source
    pub source: StationSource,

    /// Length of generated messages (None = use the scenario's messages)
    pub random_message_len: Option<usize>,

    /// Seed for generated messages
    pub seed: u64,

    // === Decoding ===
    /// Trailing bit group policy (None = scenario value or default)
    pub trailing_bits: Option<TrailingBits>,

    // === Validation ===
    /// Orthogonality tolerance, when the check is enabled
    pub orthogonality_tolerance: Option<u64>,

    // === Behavior ===
    /// Whether to print the combined signal
    pub show_signal: bool,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Resolve parsed arguments into a run configuration.
    ///
    /// If no seed is given, a time-based one is chosen (and printed with
    /// `--print-config`).
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let seed = cli.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

        let source = match (cli.scenario, cli.walsh) {
            (Some(path), _) => StationSource::File(path),
            (None, Some(0)) => bail!("--walsh needs at least one station"),
            (None, Some(stations)) => {
                // Row 0 of a Walsh matrix is all ones and is not assigned.
                let order = stations
                    .checked_add(1)
                    .and_then(usize::checked_next_power_of_two)
                    .filter(|&order| order <= MAX_WALSH_ORDER);
                match order {
                    Some(order) => StationSource::Walsh { stations, order },
                    None => bail!(
                        "--walsh supports at most {} stations, got {}",
                        MAX_WALSH_ORDER - 1,
                        stations
                    ),
                }
            }
            (None, None) => StationSource::Reference,
        };

        let random_message_len = match (&source, cli.random_messages) {
            (StationSource::Walsh { .. }, None) => Some(DEFAULT_MESSAGE_LEN),
            (_, len) => len,
        };

        Ok(Config {
            source,
            random_message_len,
            seed,
            trailing_bits: cli.trailing,
            orthogonality_tolerance: cli.require_orthogonal.then_some(cli.tolerance),
            show_signal: cli.show_signal,
            print_config: cli.print_config,
            print_metrics: !cli.no_metrics,
        })
    }

    /// Load the scenario this configuration describes.
    pub fn scenario(&self) -> anyhow::Result<Scenario> {
        match &self.source {
            StationSource::Reference => Ok(Scenario::reference()),
            StationSource::File(path) => Scenario::load(path),
            StationSource::Walsh { stations, order } => {
                let stations = (1..=*stations)
                    .map(|row| {
                        let code = walsh_code(*order, row).context("failed to generate Walsh codes")?;
                        Ok(StationEntry {
                            id: format!("S{}", row),
                            code: code.chips().iter().map(|&c| i32::from(c)).collect(),
                            message: None,
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(Scenario {
                    trailing: None,
                    stations,
                })
            }
        }
    }

    /// Build the station table and the effective trailing-bit policy.
    pub fn resolve(&self) -> anyhow::Result<(StationTable, TrailingBits)> {
        let scenario = self.scenario()?;

        let trailing_bits = match self.trailing_bits {
            Some(policy) => policy,
            None => scenario.trailing_bits()?.unwrap_or_default(),
        };

        let messages = self
            .random_message_len
            .map(|len| generate_messages(self.seed, scenario.stations.len(), len));

        let table = scenario.into_table(messages)?;
        Ok((table, trailing_bits))
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.source {
            StationSource::Reference => println!("Stations: built-in reference (A-D)"),
            StationSource::File(path) => println!("Stations: {}", path.display()),
            StationSource::Walsh { stations, order } => {
                println!("Stations: {} Walsh-Hadamard codes of order {}", stations, order)
            }
        }
        match self.random_message_len {
            Some(len) => println!("Messages: random, {} characters", len),
            None => println!("Messages: from scenario"),
        }
        println!("Seed: {}", self.seed);
        println!();
        println!("=== Decoding ===");
        match self.trailing_bits {
            Some(policy) => println!("Trailing bits: {}", policy),
            None => println!("Trailing bits: (scenario or default)"),
        }
        match self.orthogonality_tolerance {
            Some(tolerance) => println!("Orthogonality: required (tolerance {})", tolerance),
            None => println!("Orthogonality: not enforced"),
        }
        println!();
    }
}

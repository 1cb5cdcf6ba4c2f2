//! cdma-sim: run a shared-channel CDMA simulation from the command line.
//!
//! Every station's message is spread with its own code, all transmissions
//! are summed onto one channel, and each station's receiver recovers its
//! message from the combined signal alone.

mod config;
mod input_gen;
mod scenario;

use anyhow::Context;
use cdma_sim_core::simulation::{Simulation, SimulationReport};
use clap::Parser;
use config::{Cli, Config};
use env_logger::Builder;
use log::{debug, LevelFilter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_cli(cli)?;
    if config.print_config {
        config.print();
    }

    let (table, trailing_bits) = config.resolve()?;
    debug!(
        "{} stations, chip length {:?}, trailing bits {}",
        table.len(),
        table.chip_length(),
        trailing_bits
    );

    for (id, station) in table.iter() {
        println!("Station {} sends {:?} with code {}", id, station.message, station.code);
    }

    let mut simulation = Simulation::new(table).with_trailing_bits(trailing_bits);
    if let Some(tolerance) = config.orthogonality_tolerance {
        simulation = simulation.with_orthogonality_check(tolerance);
    }

    println!("Transmitting on the shared channel...");
    let report = simulation.run().context("simulation failed")?;

    if config.show_signal {
        print_signal(&report, simulation.table().chip_length().unwrap_or(1));
    }
    print_outcomes(&report);

    if config.print_metrics {
        report.metrics.print_summary();
    }
    report.metrics.print_result();

    if !report.all_intact() {
        std::process::exit(1);
    }
    Ok(())
}

/// Logging goes to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some("cdma_sim"), level)
        .filter(Some("cdma_sim_core"), level)
        .parse_default_env()
        .init();
}

fn print_outcomes(report: &SimulationReport) {
    for (id, outcome) in &report.outcomes {
        match &outcome.result {
            Ok(text) if outcome.is_intact() => {
                println!("Station {} recovered {:?}", id, text);
            }
            Ok(text) => {
                println!(
                    "Station {} recovered {:?} (sent {:?}, {} bit errors)",
                    id,
                    text,
                    outcome.source,
                    outcome.bit_errors.unwrap_or_default()
                );
            }
            Err(err) => println!("Station {} failed: {}", id, err),
        }
    }
}

/// One line per bit period.
fn print_signal(report: &SimulationReport, chip_length: usize) {
    println!("=== Combined Signal ({} chips) ===", report.signal.len());
    for (i, block) in report.signal.chunks(chip_length.max(1)).enumerate() {
        let chips: Vec<String> = block.iter().map(|c| format!("{:+}", c)).collect();
        println!("{:4}: {}", i, chips.join(" "));
    }
    println!();
}

//! vantage probe
//!
//! Headless driver for the camera transforms and the anchored panner.
//!
//! - `roundtrip`: deproject screen samples, project them back, report the error
//! - `pan`: replay a scripted drag and report how well the anchor stays pinned

mod probe;
mod recorder;
mod scenario;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use vantage_control::PanConfig;

use crate::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(name = "vantage-probe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Screen -> world -> screen over the scenario's samples
    Roundtrip {
        /// Scenario JSON; the built-in 1080p scenario when omitted
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Fail if any sample drifts further than this many pixels
        #[arg(short, long, default_value_t = 0.5)]
        tolerance: f32,
    },
    /// Replay the scenario's drag through the panner
    Pan {
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Pan config JSON overriding the scenario's `pan` section
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write one CSV row per frame here
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Fail if the anchor drifts further than this many pixels from the cursor
        #[arg(short, long, default_value_t = 0.5)]
        tolerance: f32,
    },
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scenario(path: Option<&PathBuf>) -> Result<Scenario> {
    match path {
        Some(path) => Scenario::load(path),
        None => {
            tracing::info!("no scenario given, using the built-in one");
            Ok(Scenario::default())
        }
    }
}

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    match args.command {
        Command::Roundtrip {
            scenario,
            tolerance,
        } => {
            let scenario = load_scenario(scenario.as_ref())?;
            let report = probe::run_roundtrip(&scenario)?;
            print_report(&report)?;

            if report.max_screen_error > tolerance {
                bail!(
                    "round trip error {} px exceeds tolerance {tolerance} px",
                    report.max_screen_error
                );
            }
        }
        Command::Pan {
            scenario,
            config,
            csv,
            tolerance,
        } => {
            let mut scenario = load_scenario(scenario.as_ref())?;
            if let Some(path) = &config {
                scenario.pan = PanConfig::load(path)
                    .with_context(|| format!("failed to load pan config {}", path.display()))?;
            }
            let sink = match &csv {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    Some(Box::new(BufWriter::new(file)) as Box<dyn Write>)
                }
                None => None,
            };

            let report = probe::run_pan(&scenario, sink)?;
            print_report(&report)?;

            if report.max_pin_error > tolerance {
                bail!(
                    "anchor drifted {} px from the cursor, tolerance {tolerance} px",
                    report.max_pin_error
                );
            }
        }
    }

    Ok(())
}

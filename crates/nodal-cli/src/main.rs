//! Command-line runner: load a schematic preset, run an analysis, print
//! the report.

mod output;
mod preset;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;

use nodal_solver::{SweepConfig, TransientConfig, solve_ac_sweep, solve_circuit, solve_transient};

#[derive(Parser)]
#[command(name = "nodal", version, about = "Circuit analysis on schematic presets")]
struct Cli {
    /// Preset file (JSON) describing the circuit.
    preset: PathBuf,

    /// Also write the full report as JSON.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    #[command(subcommand)]
    analysis: Analysis,
}

#[derive(Subcommand)]
enum Analysis {
    /// DC operating point.
    Op {
        /// Bias frequency echoed into the report.
        #[arg(long, default_value_t = 0.0)]
        frequency: f64,
    },
    /// AC magnitude sweep over a log-spaced frequency grid.
    Ac {
        /// Start frequency in Hz.
        #[arg(long, default_value_t = 1.0)]
        start: f64,
        /// Stop frequency in Hz.
        #[arg(long, default_value_t = 1e6)]
        stop: f64,
        /// Number of frequency points.
        #[arg(long, default_value_t = 100)]
        points: usize,
    },
    /// Transient integration on a fixed time grid.
    Tran {
        /// Time step in seconds.
        #[arg(long, default_value_t = 1e-5)]
        step: f64,
        /// Stop time in seconds.
        #[arg(long, default_value_t = 5e-3)]
        stop: f64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.preset)
        .with_context(|| format!("reading {}", cli.preset.display()))?;
    let circuit = preset::parse(&text)?;
    info!(
        "loaded {} components, {} wires",
        circuit.components.len(),
        circuit.wires.len()
    );

    let report = match cli.analysis {
        Analysis::Op { frequency } => solve_circuit(&circuit, frequency),
        Analysis::Ac {
            start,
            stop,
            points,
        } => solve_ac_sweep(
            &circuit,
            &SweepConfig {
                start_freq: start,
                stop_freq: stop,
                points,
            },
        ),
        Analysis::Tran { step, stop } => solve_transient(
            &circuit,
            &TransientConfig {
                time_step: step,
                stop_time: stop,
            },
        ),
    };

    output::print_report(&report);

    if let Some(path) = &cli.json {
        let rendered = serde_json::to_string_pretty(&output::to_json(&report))?;
        std::fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
        info!("report written to {}", path.display());
    }

    if let Some(error) = report.error {
        bail!("analysis failed: {error}");
    }
    Ok(())
}

//! Evaluar CLI
//!
//! Scores a cross-validated prediction file against its dataset and split plan.
//!
//! # Usage
//!
//! ```bash
//! # JSON report on stdout
//! evaluar evaluate iris.arff splits.arff predictions.arff class
//!
//! # Human-readable report
//! evaluar evaluate iris.arff splits.arff predictions.arff class --format text
//!
//! # Validate schema and completeness only
//! evaluar check iris.arff splits.arff predictions.arff class
//!
//! # Trace every stage transition
//! RUST_LOG=evaluar=debug evaluar evaluate iris.arff splits.arff predictions.arff class
//! ```

use clap::Parser;
use evaluar::cli::{run_command, Cli};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; RUST_LOG overrides the flag-derived level
fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! evaluar evaluate dataset.arff splits.arff predictions.arff class
//! evaluar evaluate dataset.arff splits.arff predictions.arff class --format text
//! evaluar check dataset.arff splits.arff predictions.arff class
//! evaluar evaluate https://example.org/d.arff splits.arff predictions.arff class
//! ```

mod core;
mod types;

pub use core::{apply_overrides, parse_args, CheckArgs, Cli, Command, EvaluateArgs, InputArgs};
pub use types::OutputFormat;

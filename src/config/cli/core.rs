//! Core CLI types - Cli, Command and argument structs

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;
use crate::config::EvalConfig;
use crate::io::Location;

/// Evaluar: auditable scoring of cross-validated predictions
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "evaluar")]
#[command(author = "PAIML")]
#[command(version)]
#[command(
    about = "Score cross-validated predictions against a dataset and split plan"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Evaluate predictions and print the metric report
    Evaluate(EvaluateArgs),

    /// Validate schema, ranges and completeness without computing metrics
    Check(CheckArgs),
}

/// Input locations shared by every command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct InputArgs {
    /// Dataset ARFF file or http(s) URL
    #[arg(value_name = "DATASET")]
    pub dataset: Location,

    /// Split-plan ARFF file or http(s) URL
    #[arg(value_name = "SPLITS")]
    pub splits: Location,

    /// Predictions ARFF file or http(s) URL
    #[arg(value_name = "PREDICTIONS")]
    pub predictions: Location,

    /// Name of the target attribute in the dataset
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// YAML evaluation config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the number of offending keys listed per category
    #[arg(long)]
    pub max_reported_keys: Option<usize>,
}

/// Arguments for the evaluate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,

    /// Single-line JSON output
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CheckArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to an EvalConfig
pub fn apply_overrides(config: &mut EvalConfig, inputs: &InputArgs, compact: bool) {
    if let Some(limit) = inputs.max_reported_keys {
        config.max_reported_keys = limit;
    }
    if compact {
        config.pretty = false;
    }
}

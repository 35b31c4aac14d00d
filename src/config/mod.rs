//! Evaluation configuration
//!
//! Column-naming rules for the three input tables, diagnostic limits and
//! output options. Loaded from YAML or built from defaults, then validated
//! before any input is read.

pub mod cli;
mod schema;
mod validate;

pub use cli::{parse_args, CheckArgs, Cli, Command, EvaluateArgs, OutputFormat};
pub use schema::{load_config, EvalConfig, PredictionColumnNames, SplitColumnNames};
pub use validate::{validate_config, ValidationError};

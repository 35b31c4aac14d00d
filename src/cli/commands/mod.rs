//! CLI command implementations

mod check;
mod evaluate;


use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::cli::{apply_overrides, InputArgs};
use crate::config::{load_config, Cli, Command, EvalConfig};
use crate::eval::{EvaluationRun, InputSource};
use crate::EvalError;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.quiet, cli.verbose);

    match cli.command {
        Command::Evaluate(args) => evaluate::run_evaluate(args, log_level),
        Command::Check(args) => check::run_check(args, log_level),
    }
}

/// Load the config file (or defaults) and apply command-line overrides
fn resolve_config(inputs: &InputArgs, compact: bool, level: LogLevel) -> Result<EvalConfig, String> {
    let mut config = match &inputs.config {
        Some(path) => {
            log(level, LogLevel::Verbose, &format!("Loading config: {}", path.display()));
            load_config(path).map_err(|e| format_error(&e))?
        }
        None => EvalConfig::default(),
    };
    apply_overrides(&mut config, inputs, compact);
    Ok(config)
}

fn input_source(inputs: &InputArgs) -> InputSource {
    InputSource::locations(
        inputs.dataset.clone(),
        inputs.splits.clone(),
        inputs.predictions.clone(),
    )
}

/// Console rendering of an evaluation error
fn format_error(err: &EvalError) -> String {
    format!("[{}] {err}", err.code())
}

/// Console rendering of an error raised by `run`, naming the failed stage
fn format_run_error(run: &EvaluationRun<'_>, err: &EvalError) -> String {
    match run.failed_at() {
        Some(stage) => format!("{} (while {stage})", format_error(err)),
        None => format_error(err),
    }
}

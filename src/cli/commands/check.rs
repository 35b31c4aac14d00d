//! Check command implementation

use super::{format_run_error, input_source, resolve_config};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::CheckArgs;
use crate::eval::{CheckSummary, EvaluationRun};

/// Validate inputs and completeness
pub fn check_inputs(args: &CheckArgs, level: LogLevel) -> Result<CheckSummary, String> {
    let config = resolve_config(&args.inputs, false, level)?;
    let mut run = EvaluationRun::new(&config);
    run.check(input_source(&args.inputs), &args.inputs.target)
        .map_err(|e| format_run_error(&run, &e))
}

pub fn run_check(args: CheckArgs, level: LogLevel) -> Result<(), String> {
    let summary = check_inputs(&args, level)?;
    log(level, LogLevel::Normal, &summary.to_string());
    Ok(())
}

//! Evaluate command implementation

use super::{format_run_error, input_source, resolve_config};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{EvaluateArgs, OutputFormat};
use crate::eval::{EvaluationReport, EvaluationRun};

/// Run the evaluation and return the rendered report
pub fn evaluate_to_string(args: &EvaluateArgs, level: LogLevel) -> Result<String, String> {
    let config = resolve_config(&args.inputs, args.compact, level)?;

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Evaluating {} against {} (splits: {}, target: {})",
            args.inputs.predictions,
            args.inputs.dataset,
            args.inputs.splits,
            args.inputs.target
        ),
    );

    let mut run = EvaluationRun::new(&config);
    let report = run
        .execute(input_source(&args.inputs), &args.inputs.target)
        .map_err(|e| format_run_error(&run, &e))?;

    render(&report, args.format, config.pretty)
}

fn render(report: &EvaluationReport, format: OutputFormat, pretty: bool) -> Result<String, String> {
    match format {
        OutputFormat::Json => report.to_json(pretty).map_err(|e| e.to_string()),
        OutputFormat::Text => Ok(report.to_string()),
    }
}

pub fn run_evaluate(args: EvaluateArgs, level: LogLevel) -> Result<(), String> {
    let output = evaluate_to_string(&args, level)?;
    println!("{output}");
    log(level, LogLevel::Verbose, "Evaluation complete");
    Ok(())
}

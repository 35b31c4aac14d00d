//! Evaluar: auditable scoring of cross-validated predictions
//!
//! Scores a prediction file produced by an external cross-validation run against the
//! labeled dataset and the split plan that run was supposed to follow.
//!
//! ## Architecture
//!
//! - `io`: tabular model and ARFF reader
//! - `data`: dataset/target resolution, split plan, prediction schema
//! - `eval`: completeness tracking, confusion matrix, metric accumulators,
//!   population statistics and the evaluation driver
//! - `config`: evaluation configuration and CLI arguments
//! - `cli`: command handlers
//!
//! ## Example
//!
//! ```ignore
//! use evaluar::{EvalConfig, PredictionEvaluator};
//!
//! let evaluator = PredictionEvaluator::new(EvalConfig::default());
//! let report = evaluator.evaluate_files("iris.arff", "splits.arff", "predictions.arff", "class")?;
//! println!("{}", report.to_json(true)?);
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod io;

pub use config::EvalConfig;
pub use data::{Dataset, PredictionColumns, PredictionRecord, SplitKey, SplitPlan, Task};
pub use error::{ErrorKind, EvalError, Result};
pub use eval::{
    CompletenessTracker, ConfusionMatrix, EvaluationReport, InputSource, Metric,
    MetricAccumulator, MetricCollector, MetricSnapshot, PredictionEvaluator, ScoreAccumulator,
    Stage,
};

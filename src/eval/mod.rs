//! Evaluation engine
//!
//! - Completeness tracking of (repeat, fold, row) keys against a split plan
//! - Confusion matrix and classification metrics
//! - Metric accumulators, one global and one per (repeat, fold) cell
//! - Population statistics across the cell grid
//! - The driver that runs all of the above in a single pass

pub mod accumulator;
pub mod classification;
pub mod completeness;
pub mod driver;
pub mod metric;
pub mod population;
pub mod report;
pub mod snapshot;

pub use accumulator::{MetricAccumulator, Priors, ScoreAccumulator};
pub use classification::{ConfusionMatrix, MultiClassMetrics};
pub use completeness::{CompletenessDiagnostic, CompletenessTracker};
pub use driver::{EvaluationRun, InputSource, PredictionEvaluator, Stage};
pub use metric::Metric;
pub use population::{MetricCollector, PopulationStatistic};
pub use report::{CheckSummary, EvaluationReport, GlobalMetric};
pub use snapshot::{MetricSnapshot, MetricValue};

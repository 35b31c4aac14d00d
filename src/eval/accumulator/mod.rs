//! Metric accumulators
//!
//! An accumulator ingests one held-out prediction at a time and reports the
//! metrics it has gathered on demand. The driver keeps one global accumulator
//! plus one per (repeat, fold) cell and feeds them in the same pass.

mod priors;
mod score;


pub use priors::Priors;
pub use score::ScoreAccumulator;

use super::snapshot::MetricSnapshot;
use crate::data::Task;
use crate::error::Result;

/// Incremental per-instance metric accumulation
pub trait MetricAccumulator {
    /// Record one classification outcome from its confidence vector
    ///
    /// `confidences` holds one value per class in the dataset's class
    /// order; `actual` is `None` when the instance has no ground truth.
    fn observe_classification(&mut self, confidences: &[f64], actual: Option<usize>) -> Result<()>;

    /// Record one regression outcome
    fn observe_regression(&mut self, predicted: Option<f64>, actual: Option<f64>) -> Result<()>;

    /// Metrics for `task` at the current state, without mutating it
    fn snapshot(&self, num_classes: usize, task: Task) -> MetricSnapshot;

    /// Number of accepted observations
    fn observations(&self) -> usize;
}

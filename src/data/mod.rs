//! Evaluation inputs
//!
//! The three independently indexed tables of a run: the labeled dataset,
//! the split plan that defines which predictions must exist, and the
//! prediction table resolved against both.

mod dataset;
mod predictions;
mod split_plan;

pub use dataset::{Dataset, Task};
pub use predictions::{Predicted, PredictionColumns, PredictionRecord};
pub use split_plan::{SplitKey, SplitPlan};

use crate::io::Value;

/// Read a cell as a non-negative integer identifier
///
/// Accepts integral numbers and nominal/text cells whose label parses as one.
pub(crate) fn parse_identifier(value: &Value, labels: &[String]) -> Option<usize> {
    match value {
        Value::Number(v) if v.is_finite() && *v >= 0.0 && v.fract() == 0.0 => Some(*v as usize),
        Value::Number(_) | Value::Missing => None,
        Value::Nominal(i) => labels.get(*i).and_then(|l| l.trim().parse().ok()),
        Value::Text(s) => s.trim().parse().ok(),
    }
}

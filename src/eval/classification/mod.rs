//! Classification metrics
//!
//! Provides:
//! - Confusion matrix over dataset class indexes
//! - Per-class precision, recall, F1 and their support-weighted mean
//! - One-vs-rest ROC area

mod confusion;
mod metrics;
mod roc;


pub use confusion::ConfusionMatrix;
pub use metrics::MultiClassMetrics;
pub use roc::area_under_roc;

//! Evaluation report

use super::classification::ConfusionMatrix;
use super::population::MetricCollector;
use super::snapshot::MetricSnapshot;
use crate::data::{Dataset, Task};
use crate::error::{EvalError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Global value of one metric with its fold population statistics
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GlobalMetric {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_class: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdev: Option<f64>,
}

/// Final output of an evaluation run
///
/// Non-finite values serialize as JSON `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub task: Task,
    pub target: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub class_labels: Vec<String>,
    /// Rows are actual classes, columns predicted classes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub confusion_matrix: Vec<Vec<usize>>,
    pub global_metrics: BTreeMap<String, GlobalMetric>,
    /// Indexed `[repeat][fold]`
    pub fold_metrics: Vec<Vec<BTreeMap<String, f64>>>,
}

impl EvaluationReport {
    /// Assemble the report from the accumulated state of a finished pass
    pub fn new(
        dataset: &Dataset,
        confusion: &ConfusionMatrix,
        global: &MetricSnapshot,
        cells: &[Vec<MetricSnapshot>],
        population: &MetricCollector,
    ) -> Self {
        let global_metrics = population
            .combine(global)
            .into_iter()
            .map(|(metric, (value, stat))| {
                (
                    metric.name().to_string(),
                    GlobalMetric {
                        value: value.value,
                        per_class: value.per_class,
                        mean: stat.map(|s| s.mean),
                        stdev: stat.map(|s| s.stdev),
                    },
                )
            })
            .collect();

        let fold_metrics = cells
            .iter()
            .map(|folds| folds.iter().map(MetricSnapshot::to_scalar_map).collect())
            .collect();

        Self {
            task: dataset.task(),
            target: dataset.target_name().to_string(),
            class_labels: dataset.class_labels().to_vec(),
            confusion_matrix: confusion.to_rows(),
            global_metrics,
            fold_metrics,
        }
    }

    /// Global entry of a metric by reported name
    pub fn global(&self, name: &str) -> Option<&GlobalMetric> {
        self.global_metrics.get(name)
    }

    /// Metrics of one (repeat, fold) cell
    pub fn fold(&self, repeat: usize, fold: usize) -> Option<&BTreeMap<String, f64>> {
        self.fold_metrics.get(repeat).and_then(|folds| folds.get(fold))
    }

    /// Serialize to JSON
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| EvalError::Serialization {
            message: e.to_string(),
        })
    }
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Task: {} (target: {})", self.task, self.target)?;
        writeln!(f)?;
        writeln!(f, "{:<32} {:>10} {:>10} {:>10}", "Metric", "Value", "Mean", "Stdev")?;
        writeln!(f, "{}", "-".repeat(65))?;
        for (name, metric) in &self.global_metrics {
            writeln!(
                f,
                "{:<32} {:>10.4} {:>10} {:>10}",
                name,
                metric.value,
                opt(metric.mean),
                opt(metric.stdev)
            )?;
        }

        if !self.confusion_matrix.is_empty() {
            writeln!(f)?;
            writeln!(f, "Confusion matrix (rows = actual, columns = predicted):")?;
            let width = self
                .class_labels
                .iter()
                .map(String::len)
                .max()
                .unwrap_or(0)
                .max(6);
            write!(f, "{:>width$}", "")?;
            for label in &self.class_labels {
                write!(f, " {label:>width$}")?;
            }
            writeln!(f)?;
            for (label, row) in self.class_labels.iter().zip(&self.confusion_matrix) {
                write!(f, "{label:>width$}")?;
                for count in row {
                    write!(f, " {count:>width$}")?;
                }
                writeln!(f)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Per-fold metrics:")?;
        for (repeat, folds) in self.fold_metrics.iter().enumerate() {
            for (fold, metrics) in folds.iter().enumerate() {
                let headline = ["predictive_accuracy", "root_mean_squared_error"]
                    .iter()
                    .find_map(|name| metrics.get(*name).map(|v| format!("{name}={v:.4}")))
                    .unwrap_or_default();
                writeln!(f, "  repeat {repeat} fold {fold}: {headline}")?;
            }
        }
        Ok(())
    }
}

/// Outcome of a validation-only run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckSummary {
    pub task: Task,
    pub target: String,
    pub instances: usize,
    pub repeats: usize,
    pub folds: usize,
    /// Predictions required by the split plan
    pub expected: usize,
    /// Prediction records read
    pub observed: usize,
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OK: {} predictions cover {} repeat(s) x {} fold(s) of {} instances ({}, target {})",
            self.observed, self.repeats, self.folds, self.instances, self.task, self.target
        )
    }
}

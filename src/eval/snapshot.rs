//! Computed metric values at one point in time

use super::metric::Metric;
use serde::Serialize;
use std::collections::BTreeMap;

/// Scalar value of a metric, plus per-class values where applicable
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricValue {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_class: Option<Vec<f64>>,
}

/// Metric values read from an accumulator
///
/// Taking a snapshot never mutates the accumulator it came from.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricSnapshot {
    values: BTreeMap<Metric, MetricValue>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scalar
    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.values.insert(
            metric,
            MetricValue {
                value,
                per_class: None,
            },
        );
    }

    /// Add a weighted scalar together with its per-class values
    pub fn insert_per_class(&mut self, metric: Metric, value: f64, per_class: Vec<f64>) {
        self.values.insert(
            metric,
            MetricValue {
                value,
                per_class: Some(per_class),
            },
        );
    }

    pub fn get(&self, metric: Metric) -> Option<&MetricValue> {
        self.values.get(&metric)
    }

    /// Scalar value of `metric`
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).map(|v| v.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MetricValue)> {
        self.values.iter().map(|(m, v)| (*m, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scalars keyed by reported metric name
    pub fn to_scalar_map(&self) -> BTreeMap<String, f64> {
        self.values
            .iter()
            .map(|(m, v)| (m.name().to_string(), v.value))
            .collect()
    }
}

//! Population statistics across the repeat x fold grid

use super::metric::Metric;
use super::snapshot::{MetricSnapshot, MetricValue};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean and dispersion of one metric across cells
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PopulationStatistic {
    pub mean: f64,
    /// Sample standard deviation (n - 1); 0.0 for a single cell
    pub stdev: f64,
    /// Number of cells
    pub count: usize,
}

impl PopulationStatistic {
    /// Statistic over `values`; `None` when there are none
    ///
    /// NaN values are not skipped, so one undefined cell makes the
    /// statistic NaN.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mean = mean(values);
        Some(Self {
            mean,
            stdev: sample_stdev(values, mean),
            count: values.len(),
        })
    }
}

/// Collects per-cell snapshots and reduces them metric by metric
#[derive(Clone, Debug, Default)]
pub struct MetricCollector {
    snapshots: Vec<MetricSnapshot>,
}

impl MetricCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one cell's snapshot
    pub fn add(&mut self, snapshot: &MetricSnapshot) {
        self.snapshots.push(snapshot.clone());
    }

    /// Number of cells collected
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Statistic of `metric`, if every cell reported it
    pub fn statistic(&self, metric: Metric) -> Option<PopulationStatistic> {
        let values = self
            .snapshots
            .iter()
            .map(|s| s.value(metric))
            .collect::<Option<Vec<f64>>>()?;
        PopulationStatistic::from_values(&values)
    }

    /// Pair every global metric with its population statistic, if any
    pub fn combine(
        &self,
        global: &MetricSnapshot,
    ) -> BTreeMap<Metric, (MetricValue, Option<PopulationStatistic>)> {
        global
            .iter()
            .map(|(metric, value)| (metric, (value.clone(), self.statistic(metric))))
            .collect()
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_stdev(values: &[f64], mean: f64) -> f64 {
    if values.len() > 1 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (values.len() - 1) as f64;
        variance.sqrt()
    } else if mean.is_nan() {
        f64::NAN
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn snapshot(accuracy: f64) -> MetricSnapshot {
        let mut s = MetricSnapshot::new();
        s.insert(Metric::PredictiveAccuracy, accuracy);
        s
    }

    #[test]
    fn test_identical_values_have_zero_stdev() {
        let stat = PopulationStatistic::from_values(&[0.25, 0.25, 0.25]).unwrap();
        assert_eq!(stat.mean, 0.25);
        assert_eq!(stat.stdev, 0.0);
        assert_eq!(stat.count, 3);
    }

    #[test]
    fn test_sample_stdev() {
        let stat = PopulationStatistic::from_values(&[0.5, 1.0]).unwrap();
        assert_abs_diff_eq!(stat.mean, 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(stat.stdev, 0.125_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_single_cell() {
        let stat = PopulationStatistic::from_values(&[0.4]).unwrap();
        assert_eq!(stat.stdev, 0.0);
        assert!(PopulationStatistic::from_values(&[]).is_none());
    }

    #[test]
    fn test_nan_propagates() {
        let stat = PopulationStatistic::from_values(&[0.5, f64::NAN]).unwrap();
        assert!(stat.mean.is_nan());
        assert!(stat.stdev.is_nan());
        let stat = PopulationStatistic::from_values(&[f64::NAN]).unwrap();
        assert!(stat.stdev.is_nan());
    }

    #[test]
    fn test_statistics_require_every_cell() {
        let mut collector = MetricCollector::new();
        let mut first = snapshot(0.5);
        first.insert(Metric::Kappa, 0.1);
        collector.add(&first);
        collector.add(&snapshot(1.0));

        let accuracy = collector.statistic(Metric::PredictiveAccuracy).unwrap();
        assert_abs_diff_eq!(accuracy.mean, 0.75, epsilon = 1e-12);
        assert_eq!(accuracy.count, 2);
        assert!(collector.statistic(Metric::Kappa).is_none());
    }

    #[test]
    fn test_combine_pairs_global_values() {
        let mut collector = MetricCollector::new();
        collector.add(&snapshot(0.5));
        collector.add(&snapshot(0.5));
        let mut global = snapshot(0.5);
        global.insert(Metric::Kappa, 0.0);

        let combined = collector.combine(&global);
        let (value, stat) = &combined[&Metric::PredictiveAccuracy];
        assert_eq!(value.value, 0.5);
        assert_eq!(stat.map(|s| s.stdev), Some(0.0));
        assert_eq!(combined[&Metric::Kappa].1, None);
    }

    #[test]
    fn test_empty_collector() {
        let collector = MetricCollector::new();
        assert!(collector.is_empty());
        assert!(collector.statistic(Metric::PredictiveAccuracy).is_none());
    }
}

//! Per-class precision, recall and F-measure

use super::confusion::ConfusionMatrix;

/// Per-class scores read off a confusion matrix
#[derive(Clone, Debug)]
pub struct MultiClassMetrics {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
    /// Instances per actual class
    pub support: Vec<usize>,
}

impl MultiClassMetrics {
    /// Scores of every class of `cm`
    ///
    /// A ratio with an empty denominator is 0.0.
    pub fn from_confusion_matrix(cm: &ConfusionMatrix) -> Self {
        let n = cm.n_classes();
        let mut metrics = Self {
            precision: Vec::with_capacity(n),
            recall: Vec::with_capacity(n),
            f1: Vec::with_capacity(n),
            support: Vec::with_capacity(n),
        };

        for class in 0..n {
            let tp = cm.true_positives(class);
            let p = ratio(tp, tp + cm.false_positives(class));
            let r = ratio(tp, tp + cm.false_negatives(class));
            let f = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 };

            metrics.precision.push(p);
            metrics.recall.push(r);
            metrics.f1.push(f);
            metrics.support.push(cm.support(class));
        }
        metrics
    }

    /// Support-weighted mean of per-class values
    ///
    /// Classes without support do not contribute. A NaN value of a supported
    /// class makes the mean NaN, as does an empty matrix.
    pub fn weighted(&self, values: &[f64]) -> f64 {
        let total_support: usize = self.support.iter().sum();
        if total_support == 0 {
            return f64::NAN;
        }
        values
            .iter()
            .zip(&self.support)
            .filter(|&(_, &s)| s > 0)
            .map(|(&v, &s)| v * s as f64)
            .sum::<f64>()
            / total_support as f64
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

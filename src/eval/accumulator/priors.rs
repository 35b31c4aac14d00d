//! Prior predictor derived from the full dataset

use crate::data::{Dataset, Task};

/// Baseline the relative metrics are measured against
#[derive(Clone, Debug, PartialEq)]
pub enum Priors {
    /// Laplace-corrected class counts: one plus the count of each class
    Class { counts: Vec<f64>, sum: f64 },
    /// Mean of the known target values
    Numeric { mean: f64 },
}

impl Priors {
    /// Compute priors over every instance with a known target
    pub fn from_dataset(dataset: &Dataset) -> Self {
        match dataset.task() {
            Task::Classification => {
                let mut counts = vec![1.0; dataset.num_classes()];
                for row in 0..dataset.num_instances() {
                    if let Some(class) = dataset.class_index(row) {
                        counts[class] += 1.0;
                    }
                }
                let sum = counts.iter().sum();
                Priors::Class { counts, sum }
            }
            Task::Regression => {
                let (total, n) = dataset
                    .targets()
                    .flatten()
                    .fold((0.0, 0.0), |(total, n), v| (total + v, n + 1.0));
                Priors::Numeric { mean: total / n }
            }
        }
    }

    /// Prior prediction as a distribution: class probabilities, or the mean
    pub fn distribution(&self) -> Vec<f64> {
        match self {
            Priors::Class { counts, sum } => counts.iter().map(|c| c / sum).collect(),
            Priors::Numeric { mean } => vec![*mean],
        }
    }

    /// Entropy of the class prior in bits; NaN for numeric priors
    pub fn entropy(&self) -> f64 {
        match self {
            Priors::Class { .. } => self
                .distribution()
                .iter()
                .map(|p| -p * p.log2())
                .sum(),
            Priors::Numeric { .. } => f64::NAN,
        }
    }
}

//! Counting accumulator for classification and regression scores

use super::priors::Priors;
use super::MetricAccumulator;
use crate::data::{Dataset, Task};
use crate::error::{EvalError, Result};
use crate::eval::classification::{area_under_roc, ConfusionMatrix, MultiClassMetrics};
use crate::eval::metric::Metric;
use crate::eval::snapshot::MetricSnapshot;

/// Smallest probability used in log-scores (smallest positive subnormal)
const MIN_SF_PROB: f64 = 5e-324;

/// Accumulates error sums, information scores and an arg-max confusion
/// matrix for one group of predictions
///
/// Instances without ground truth are counted but otherwise ignored. A
/// classification instance whose confidences are all zero, or a regression
/// instance with no predicted value, counts as unclassified.
#[derive(Clone, Debug)]
pub struct ScoreAccumulator {
    task: Task,
    num_classes: usize,
    priors: Priors,
    prior_distribution: Vec<f64>,
    observations: usize,
    with_class: f64,
    unclassified: f64,
    correct: f64,
    sum_abs_err: f64,
    sum_sqr_err: f64,
    sum_prior_abs_err: f64,
    sum_prior_sqr_err: f64,
    sum_kb_info: f64,
    sum_scheme_entropy: f64,
    sum_class: f64,
    sum_sqr_class: f64,
    sum_predicted: f64,
    sum_sqr_predicted: f64,
    sum_class_predicted: f64,
    confusion: ConfusionMatrix,
    /// (confidences, actual class) of every classification instance with a
    /// known class, for the ROC areas
    scored: Vec<(Vec<f64>, usize)>,
}

impl ScoreAccumulator {
    /// Accumulator for `dataset`, with priors computed from all its instances
    pub fn new(dataset: &Dataset) -> Self {
        Self::with_priors(dataset.task(), dataset.num_classes(), Priors::from_dataset(dataset))
    }

    /// Accumulator sharing priors computed elsewhere
    pub fn with_priors(task: Task, num_classes: usize, priors: Priors) -> Self {
        let prior_distribution = priors.distribution();
        Self {
            task,
            num_classes,
            priors,
            prior_distribution,
            observations: 0,
            with_class: 0.0,
            unclassified: 0.0,
            correct: 0.0,
            sum_abs_err: 0.0,
            sum_sqr_err: 0.0,
            sum_prior_abs_err: 0.0,
            sum_prior_sqr_err: 0.0,
            sum_kb_info: 0.0,
            sum_scheme_entropy: 0.0,
            sum_class: 0.0,
            sum_sqr_class: 0.0,
            sum_predicted: 0.0,
            sum_sqr_predicted: 0.0,
            sum_class_predicted: 0.0,
            confusion: ConfusionMatrix::new(num_classes),
            scored: Vec::new(),
        }
    }

    fn classified(&self) -> f64 {
        self.with_class - self.unclassified
    }

    fn update_numeric_scores(&mut self, predicted: &[f64], actual: &[f64]) {
        let n = predicted.len() as f64;
        let mut abs_err = 0.0;
        let mut sqr_err = 0.0;
        let mut prior_abs_err = 0.0;
        let mut prior_sqr_err = 0.0;
        for ((p, a), prior) in predicted.iter().zip(actual).zip(&self.prior_distribution) {
            let diff = p - a;
            abs_err += diff.abs();
            sqr_err += diff * diff;
            let diff = prior - a;
            prior_abs_err += diff.abs();
            prior_sqr_err += diff * diff;
        }
        self.sum_abs_err += abs_err / n;
        self.sum_sqr_err += sqr_err / n;
        self.sum_prior_abs_err += prior_abs_err / n;
        self.sum_prior_sqr_err += prior_sqr_err / n;
    }

    /// Cross entropy of the predictions, in bits per classified instance
    fn mean_scheme_entropy(&self) -> f64 {
        self.sum_scheme_entropy / self.classified()
    }

    fn mean_absolute_error(&self) -> f64 {
        self.sum_abs_err / self.classified()
    }

    fn root_mean_squared_error(&self) -> f64 {
        (self.sum_sqr_err / self.classified()).sqrt()
    }

    fn mean_prior_absolute_error(&self) -> f64 {
        self.sum_prior_abs_err / self.with_class
    }

    fn root_mean_prior_squared_error(&self) -> f64 {
        (self.sum_prior_sqr_err / self.with_class).sqrt()
    }

    fn correlation_coefficient(&self) -> f64 {
        let n = self.classified();
        let var_actual = self.sum_sqr_class - self.sum_class * self.sum_class / n;
        let var_predicted = self.sum_sqr_predicted - self.sum_predicted * self.sum_predicted / n;
        let var_prod = self.sum_class_predicted - self.sum_class * self.sum_predicted / n;
        if var_actual * var_predicted <= 0.0 {
            0.0
        } else {
            var_prod / (var_actual * var_predicted).sqrt()
        }
    }

    fn scalar(&self, metric: Metric) -> f64 {
        match metric {
            Metric::CorrelationCoefficient => self.correlation_coefficient(),
            Metric::Kappa => self.confusion.kappa(),
            Metric::KbRelativeInformationScore => self.sum_kb_info / self.priors.entropy(),
            Metric::MeanAbsoluteError => self.mean_absolute_error(),
            Metric::MeanPriorAbsoluteError => self.mean_prior_absolute_error(),
            Metric::MeanSchemeEntropy => self.mean_scheme_entropy(),
            Metric::NumberOfInstances => self.with_class,
            Metric::PredictiveAccuracy => self.correct / self.with_class,
            Metric::PriorEntropy => self.priors.entropy(),
            Metric::RelativeAbsoluteError => {
                self.mean_absolute_error() / self.mean_prior_absolute_error()
            }
            Metric::RootMeanPriorSquaredError => self.root_mean_prior_squared_error(),
            Metric::RootMeanSquaredError => self.root_mean_squared_error(),
            Metric::RootRelativeSquaredError => {
                self.root_mean_squared_error() / self.root_mean_prior_squared_error()
            }
            Metric::UnclassifiedInstances => self.unclassified,
            Metric::AreaUnderRocCurve | Metric::FMeasure | Metric::Precision | Metric::Recall => {
                f64::NAN
            }
        }
    }

    /// One ROC area per class, one-vs-rest over the stored confidences
    fn roc_areas(&self) -> Vec<f64> {
        (0..self.num_classes)
            .map(|class| {
                let scores: Vec<(f64, bool)> = self
                    .scored
                    .iter()
                    .map(|(confidences, actual)| (confidences[class], *actual == class))
                    .collect();
                area_under_roc(&scores)
            })
            .collect()
    }
}

impl MetricAccumulator for ScoreAccumulator {
    fn observe_classification(&mut self, confidences: &[f64], actual: Option<usize>) -> Result<()> {
        if self.task != Task::Classification {
            return Err(EvalError::Internal {
                message: "classification outcome fed to a regression accumulator".into(),
            });
        }
        if confidences.len() != self.num_classes {
            return Err(EvalError::Internal {
                message: format!(
                    "confidence vector has {} entries, expected {}",
                    confidences.len(),
                    self.num_classes
                ),
            });
        }
        let Some(actual) = actual else {
            self.observations += 1;
            return Ok(());
        };
        if actual >= self.num_classes {
            return Err(EvalError::Internal {
                message: format!("class index {actual} out of range"),
            });
        }
        self.observations += 1;
        self.scored.push((confidences.to_vec(), actual));

        // first strict maximum above zero
        let mut predicted = None;
        let mut best = 0.0;
        for (class, &p) in confidences.iter().enumerate() {
            if p > best {
                predicted = Some(class);
                best = p;
            }
        }

        self.with_class += 1.0;
        let Some(predicted) = predicted else {
            self.unclassified += 1.0;
            return Ok(());
        };

        let predicted_prob = confidences[actual].max(MIN_SF_PROB);
        let prior_prob = self.prior_distribution[actual].max(MIN_SF_PROB);
        if predicted_prob >= prior_prob {
            self.sum_kb_info += predicted_prob.log2() - prior_prob.log2();
        } else {
            self.sum_kb_info -= (1.0 - predicted_prob).log2() - (1.0 - prior_prob).log2();
        }
        self.sum_scheme_entropy -= predicted_prob.log2();

        let mut one_hot = vec![0.0; self.num_classes];
        one_hot[actual] = 1.0;
        self.update_numeric_scores(confidences, &one_hot);

        self.confusion.add(actual, predicted);
        if predicted == actual {
            self.correct += 1.0;
        }
        Ok(())
    }

    fn observe_regression(&mut self, predicted: Option<f64>, actual: Option<f64>) -> Result<()> {
        if self.task != Task::Regression {
            return Err(EvalError::Internal {
                message: "regression outcome fed to a classification accumulator".into(),
            });
        }
        self.observations += 1;
        let Some(actual) = actual.filter(|v| !v.is_nan()) else {
            return Ok(());
        };

        self.with_class += 1.0;
        let Some(predicted) = predicted.filter(|v| !v.is_nan()) else {
            self.unclassified += 1.0;
            return Ok(());
        };

        self.sum_class += actual;
        self.sum_sqr_class += actual * actual;
        self.sum_class_predicted += actual * predicted;
        self.sum_predicted += predicted;
        self.sum_sqr_predicted += predicted * predicted;
        self.update_numeric_scores(&[predicted], &[actual]);
        Ok(())
    }

    fn snapshot(&self, num_classes: usize, task: Task) -> MetricSnapshot {
        let mut snapshot = MetricSnapshot::new();
        let metrics = Metric::for_task(task);

        let per_class = (task == Task::Classification).then(|| {
            let counts = MultiClassMetrics::from_confusion_matrix(&self.confusion);
            let roc = self.roc_areas();
            (counts, roc)
        });

        for &metric in metrics {
            match (&per_class, metric) {
                (Some((counts, roc)), m) if m.is_per_class() => {
                    let values = match m {
                        Metric::Precision => &counts.precision,
                        Metric::Recall => &counts.recall,
                        Metric::FMeasure => &counts.f1,
                        _ => roc,
                    };
                    let weighted = counts.weighted(values);
                    let mut values = values.clone();
                    values.resize(num_classes, f64::NAN);
                    snapshot.insert_per_class(m, weighted, values);
                }
                (_, m) => snapshot.insert(m, self.scalar(m)),
            }
        }
        snapshot
    }

    fn observations(&self) -> usize {
        self.observations
    }
}

//! Evaluation metric definitions

use crate::data::Task;
use serde::{Serialize, Serializer};
use std::fmt;

/// Metrics an accumulator can report
///
/// Declaration order is alphabetical by serialized name, so ordered maps
/// keyed by `Metric` iterate in the same order as the JSON report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    /// Support-weighted area under the ROC curve
    AreaUnderRocCurve,
    /// Pearson correlation of predicted and actual values
    CorrelationCoefficient,
    /// Support-weighted F-measure
    FMeasure,
    /// Cohen's kappa
    Kappa,
    /// Kononenko-Bratko information score relative to the prior entropy
    KbRelativeInformationScore,
    /// Mean Absolute Error
    MeanAbsoluteError,
    /// Mean absolute error of the prior predictor
    MeanPriorAbsoluteError,
    /// Log-loss: mean bits needed to encode the actual class under the
    /// predicted distribution
    MeanSchemeEntropy,
    /// Instances with a known target
    NumberOfInstances,
    /// Support-weighted precision
    Precision,
    /// Fraction of correctly classified instances
    PredictiveAccuracy,
    /// Entropy of the class prior, in bits
    PriorEntropy,
    /// Support-weighted recall
    Recall,
    /// MAE relative to the prior predictor
    RelativeAbsoluteError,
    /// Root mean squared error of the prior predictor
    RootMeanPriorSquaredError,
    /// Root Mean Squared Error
    RootMeanSquaredError,
    /// RMSE relative to the prior predictor
    RootRelativeSquaredError,
    /// Instances without a usable prediction
    UnclassifiedInstances,
}

const CLASSIFICATION: &[Metric] = &[
    Metric::AreaUnderRocCurve,
    Metric::FMeasure,
    Metric::Kappa,
    Metric::KbRelativeInformationScore,
    Metric::MeanAbsoluteError,
    Metric::MeanPriorAbsoluteError,
    Metric::MeanSchemeEntropy,
    Metric::NumberOfInstances,
    Metric::Precision,
    Metric::PredictiveAccuracy,
    Metric::PriorEntropy,
    Metric::Recall,
    Metric::RelativeAbsoluteError,
    Metric::RootMeanPriorSquaredError,
    Metric::RootMeanSquaredError,
    Metric::RootRelativeSquaredError,
    Metric::UnclassifiedInstances,
];

const REGRESSION: &[Metric] = &[
    Metric::CorrelationCoefficient,
    Metric::MeanAbsoluteError,
    Metric::MeanPriorAbsoluteError,
    Metric::NumberOfInstances,
    Metric::RelativeAbsoluteError,
    Metric::RootMeanPriorSquaredError,
    Metric::RootMeanSquaredError,
    Metric::RootRelativeSquaredError,
    Metric::UnclassifiedInstances,
];

impl Metric {
    /// Metrics reported for `task`, in name order
    pub fn for_task(task: Task) -> &'static [Metric] {
        match task {
            Task::Classification => CLASSIFICATION,
            Task::Regression => REGRESSION,
        }
    }

    /// Whether the metric carries one value per class
    pub fn is_per_class(&self) -> bool {
        matches!(
            self,
            Metric::AreaUnderRocCurve | Metric::FMeasure | Metric::Precision | Metric::Recall
        )
    }

    /// Get metric name as reported
    pub fn name(&self) -> &'static str {
        match self {
            Metric::AreaUnderRocCurve => "area_under_roc_curve",
            Metric::CorrelationCoefficient => "correlation_coefficient",
            Metric::FMeasure => "f_measure",
            Metric::Kappa => "kappa",
            Metric::KbRelativeInformationScore => "kb_relative_information_score",
            Metric::MeanAbsoluteError => "mean_absolute_error",
            Metric::MeanPriorAbsoluteError => "mean_prior_absolute_error",
            Metric::MeanSchemeEntropy => "mean_scheme_entropy",
            Metric::NumberOfInstances => "number_of_instances",
            Metric::Precision => "precision",
            Metric::PredictiveAccuracy => "predictive_accuracy",
            Metric::PriorEntropy => "prior_entropy",
            Metric::Recall => "recall",
            Metric::RelativeAbsoluteError => "relative_absolute_error",
            Metric::RootMeanPriorSquaredError => "root_mean_prior_squared_error",
            Metric::RootMeanSquaredError => "root_mean_squared_error",
            Metric::RootRelativeSquaredError => "root_relative_squared_error",
            Metric::UnclassifiedInstances => "unclassified_instances",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_matches_name_order() {
        let mut all: Vec<Metric> = CLASSIFICATION.iter().chain(REGRESSION).copied().collect();
        all.sort();
        all.dedup();
        let names: Vec<&str> = all.iter().map(Metric::name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_task_sets() {
        let classification = Metric::for_task(Task::Classification);
        assert!(classification.contains(&Metric::PredictiveAccuracy));
        assert!(!classification.contains(&Metric::CorrelationCoefficient));
        assert!(classification.contains(&Metric::MeanSchemeEntropy));
        let regression = Metric::for_task(Task::Regression);
        assert!(regression.contains(&Metric::CorrelationCoefficient));
        assert!(!regression.contains(&Metric::Kappa));
        assert!(!regression.contains(&Metric::MeanSchemeEntropy));
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(Metric::FMeasure.to_string(), "f_measure");
        assert_eq!(
            serde_json::to_string(&Metric::Kappa).unwrap(),
            "\"kappa\""
        );
    }
}

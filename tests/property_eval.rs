//! Property tests for the evaluation engine
//!
//! Ensures the evaluation pipeline satisfies its invariants:
//! - Completeness succeeds exactly on a one-to-one cover of the split plan
//! - Confusion matrix cells are conserved
//! - Global and per-cell accumulators see the same predictions
//! - Snapshots are idempotent
//! - Population statistics are bounded by the cell values

use evaluar::eval::{
    CompletenessTracker, ConfusionMatrix, InputSource, Metric, MetricAccumulator,
    PopulationStatistic, PredictionEvaluator, ScoreAccumulator,
};
use evaluar::io::{Attribute, Table, Value};
use evaluar::{Dataset, SplitKey, SplitPlan, Task};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// Strategy Helpers
// =============================================================================

/// (rows, repeats, folds, seed) of a plain cross-validation plan
fn plan_shape() -> impl Strategy<Value = (usize, usize, usize, u64)> {
    (2usize..30, 1usize..4, 2usize..6, any::<u64>())
        .prop_filter("at least one row per fold", |(rows, _, folds, _)| rows >= folds)
}

/// Confidence vector over `n` classes, sometimes all zero
fn confidences(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop_oneof![
        4 => vec(0.0f64..1.0, n),
        1 => Just(vec![0.0; n]),
    ]
}

fn class_dataset(classes: &[usize], n_classes: usize) -> Dataset {
    let labels: Vec<String> = (0..n_classes).map(|c| format!("c{c}")).collect();
    let mut table = Table::new("d", vec![Attribute::nominal("class", labels)]);
    for &class in classes {
        table.push_row(vec![Value::Nominal(class)]).unwrap();
    }
    Dataset::new(table, "class").unwrap()
}

fn splits_table(plan: &SplitPlan) -> Table {
    let mut table = Table::new(
        "splits",
        vec![
            Attribute::nominal("type", ["TRAIN", "TEST"]),
            Attribute::numeric("rowid"),
            Attribute::numeric("repeat"),
            Attribute::numeric("fold"),
        ],
    );
    for key in plan.expected() {
        table
            .push_row(vec![
                Value::Nominal(1),
                Value::Number(key.row_id as f64),
                Value::Number(key.repeat as f64),
                Value::Number(key.fold as f64),
            ])
            .unwrap();
    }
    table
}

fn predictions_table(plan: &SplitPlan, n_classes: usize, seed: u64) -> Table {
    let mut attributes = vec![
        Attribute::numeric("repeat"),
        Attribute::numeric("fold"),
        Attribute::numeric("row_id"),
        Attribute::nominal("prediction", (0..n_classes).map(|c| format!("c{c}"))),
    ];
    for c in 0..n_classes {
        attributes.push(Attribute::numeric(format!("confidence.c{c}")));
    }
    let mut table = Table::new("predictions", attributes);
    for (i, key) in plan.expected().iter().enumerate() {
        let predicted = (i as u64 ^ seed) as usize % n_classes;
        let mut row = vec![
            Value::Number(key.repeat as f64),
            Value::Number(key.fold as f64),
            Value::Number(key.row_id as f64),
            Value::Nominal(predicted),
        ];
        for c in 0..n_classes {
            row.push(Value::Number(if c == predicted { 0.7 } else { 0.1 }));
        }
        table.push_row(row).unwrap();
    }
    table
}

// =============================================================================
// Completeness
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_exact_cover_passes((rows, repeats, folds, seed) in plan_shape()) {
        let plan = SplitPlan::cross_validation(rows, repeats, folds, Some(seed));
        let mut tracker = CompletenessTracker::new(&plan);
        for key in plan.expected().iter().rev() {
            tracker.record(*key);
        }
        prop_assert!(tracker.check().is_ok());
        prop_assert_eq!(tracker.observed(), rows * repeats);
    }

    #[test]
    fn prop_missing_key_is_named(
        (rows, repeats, folds, seed) in plan_shape(),
        pick in any::<prop::sample::Index>(),
    ) {
        let plan = SplitPlan::cross_validation(rows, repeats, folds, Some(seed));
        let keys: Vec<SplitKey> = plan.expected().iter().copied().collect();
        let dropped = keys[pick.index(keys.len())];

        let mut tracker = CompletenessTracker::new(&plan);
        for key in keys.iter().filter(|k| **k != dropped) {
            tracker.record(*key);
        }
        let diagnostic = tracker.diagnose();
        prop_assert!(tracker.check().is_err());
        prop_assert_eq!(diagnostic.missing, vec![dropped]);
        prop_assert_eq!(diagnostic.duplicated_count, 0);
        prop_assert_eq!(diagnostic.unexpected_count, 0);
    }

    #[test]
    fn prop_duplicate_key_is_named(
        (rows, repeats, folds, seed) in plan_shape(),
        pick in any::<prop::sample::Index>(),
    ) {
        let plan = SplitPlan::cross_validation(rows, repeats, folds, Some(seed));
        let keys: Vec<SplitKey> = plan.expected().iter().copied().collect();
        let doubled = keys[pick.index(keys.len())];

        let mut tracker = CompletenessTracker::new(&plan);
        for key in &keys {
            tracker.record(*key);
        }
        tracker.record(doubled);
        let diagnostic = tracker.diagnose();
        prop_assert!(tracker.check().is_err());
        prop_assert_eq!(diagnostic.duplicated, vec![(doubled, 2)]);
        prop_assert_eq!(diagnostic.missing_count, 0);
    }

    #[test]
    fn prop_out_of_plan_key_is_unexpected(
        (rows, repeats, folds, seed) in plan_shape(),
    ) {
        let plan = SplitPlan::cross_validation(rows, repeats, folds, Some(seed));
        let mut tracker = CompletenessTracker::new(&plan);
        for key in plan.expected() {
            tracker.record(*key);
        }
        let stray = SplitKey::new(repeats, 0, 0);
        tracker.record(stray);
        prop_assert_eq!(tracker.diagnose().unexpected, vec![stray]);
    }
}

// =============================================================================
// Confusion Matrix
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_confusion_conservation(
        pairs in vec((0usize..4, 0usize..4), 0..200)
    ) {
        let mut cm = ConfusionMatrix::new(4);
        for &(actual, predicted) in &pairs {
            prop_assert!(cm.add(actual, predicted));
        }
        prop_assert_eq!(cm.total(), pairs.len());
        for class in 0..4 {
            let row_sum = cm.support(class);
            let occurrences = pairs.iter().filter(|(a, _)| *a == class).count();
            prop_assert_eq!(row_sum, occurrences);
        }
    }

    #[test]
    fn prop_out_of_range_never_counts(actual in 0usize..10, predicted in 0usize..10) {
        let mut cm = ConfusionMatrix::new(3);
        let counted = cm.add(actual, predicted);
        prop_assert_eq!(counted, actual < 3 && predicted < 3);
        prop_assert_eq!(cm.total(), usize::from(counted));
    }
}

// =============================================================================
// Accumulators
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_global_count_equals_cell_sum(
        (rows, repeats, folds, seed) in plan_shape(),
        n_classes in 2usize..4,
    ) {
        let classes: Vec<usize> = (0..rows).map(|r| r % n_classes).collect();
        let plan = SplitPlan::cross_validation(rows, repeats, folds, Some(seed));
        let dataset_table = class_dataset(&classes, n_classes).table().clone();

        let report = PredictionEvaluator::default()
            .evaluate(
                InputSource::Tables {
                    dataset: dataset_table,
                    splits: splits_table(&plan),
                    predictions: predictions_table(&plan, n_classes, seed),
                },
                "class",
            )
            .unwrap();

        let global = report.global("number_of_instances").unwrap().value;
        let cells: f64 = report
            .fold_metrics
            .iter()
            .flatten()
            .map(|cell| cell["number_of_instances"])
            .sum();
        prop_assert_eq!(global, cells);
        prop_assert_eq!(global, (rows * repeats) as f64);

        let confusion_total: usize = report.confusion_matrix.iter().flatten().sum();
        prop_assert_eq!(confusion_total, rows * repeats);
    }

    #[test]
    fn prop_snapshot_is_idempotent(
        observations in vec((confidences(3), 0usize..3), 0..60)
    ) {
        let dataset = class_dataset(&[0, 1, 2, 2], 3);
        let mut acc = ScoreAccumulator::new(&dataset);
        for (conf, actual) in &observations {
            acc.observe_classification(conf, Some(*actual)).unwrap();
        }

        let first = acc.snapshot(3, Task::Classification);
        let second = acc.snapshot(3, Task::Classification);
        prop_assert_eq!(first.len(), second.len());
        for ((m1, v1), (m2, v2)) in first.iter().zip(second.iter()) {
            prop_assert_eq!(m1, m2);
            prop_assert_eq!(v1.value.to_bits(), v2.value.to_bits());
        }
        prop_assert_eq!(acc.observations(), observations.len());
    }

    #[test]
    fn prop_accuracy_bounded(
        observations in vec((confidences(2), 0usize..2), 1..60)
    ) {
        let dataset = class_dataset(&[0, 1], 2);
        let mut acc = ScoreAccumulator::new(&dataset);
        for (conf, actual) in &observations {
            acc.observe_classification(conf, Some(*actual)).unwrap();
        }
        let snapshot = acc.snapshot(2, Task::Classification);
        let accuracy = snapshot.value(Metric::PredictiveAccuracy).unwrap();
        prop_assert!((0.0..=1.0).contains(&accuracy), "accuracy {} out of range", accuracy);
        let unclassified = snapshot.value(Metric::UnclassifiedInstances).unwrap();
        prop_assert!(unclassified <= observations.len() as f64);
    }
}

// =============================================================================
// Population Statistics
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn prop_population_bounds(values in vec(0.0f64..1.0, 1..50)) {
        let stat = PopulationStatistic::from_values(&values).unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        prop_assert!(stat.mean >= min - 1e-12 && stat.mean <= max + 1e-12);
        prop_assert!(stat.stdev >= 0.0);
        prop_assert!(stat.stdev <= (max - min) + 1e-12);
        prop_assert_eq!(stat.count, values.len());
    }
}

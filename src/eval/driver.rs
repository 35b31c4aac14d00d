//! Evaluation driver
//!
//! Runs one evaluation as a linear state machine:
//!
//! ```text
//! Initializing -> ValidatingSchema -> SinglePass -> CompletenessCheck
//!              -> Aggregating -> Reporting -> Done
//! ```
//!
//! Any error moves the run to `Failed` and is returned unchanged; nothing
//! computed before the failure is reported.

use super::accumulator::{MetricAccumulator, Priors, ScoreAccumulator};
use super::classification::ConfusionMatrix;
use super::completeness::CompletenessTracker;
use super::population::MetricCollector;
use super::report::{CheckSummary, EvaluationReport};
use super::snapshot::MetricSnapshot;
use crate::config::EvalConfig;
use crate::data::{Dataset, Predicted, PredictionColumns, PredictionRecord, SplitPlan, Task};
use crate::error::{EvalError, Result};
use crate::io::{read_table, Location, Table};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Stage of an evaluation run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Initializing,
    ValidatingSchema,
    SinglePass,
    CompletenessCheck,
    Aggregating,
    Reporting,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Initializing => "initializing",
            Stage::ValidatingSchema => "validating schema",
            Stage::SinglePass => "single pass",
            Stage::CompletenessCheck => "completeness check",
            Stage::Aggregating => "aggregating",
            Stage::Reporting => "reporting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Where the three input tables come from
#[derive(Clone, Debug)]
pub enum InputSource {
    /// ARFF files on disk or behind http(s) URLs
    Locations {
        dataset: Location,
        splits: Location,
        predictions: Location,
    },
    /// Tables already in memory
    Tables {
        dataset: Table,
        splits: Table,
        predictions: Table,
    },
}

impl InputSource {
    pub fn locations(
        dataset: impl Into<Location>,
        splits: impl Into<Location>,
        predictions: impl Into<Location>,
    ) -> Self {
        InputSource::Locations {
            dataset: dataset.into(),
            splits: splits.into(),
            predictions: predictions.into(),
        }
    }

    fn into_tables(self) -> Result<(Table, Table, Table)> {
        match self {
            InputSource::Locations {
                dataset,
                splits,
                predictions,
            } => Ok((
                read_table(&dataset)?,
                read_table(&splits)?,
                read_table(&predictions)?,
            )),
            InputSource::Tables {
                dataset,
                splits,
                predictions,
            } => Ok((dataset, splits, predictions)),
        }
    }
}

/// Materialized inputs of one run
struct Inputs {
    dataset: Dataset,
    plan: SplitPlan,
    predictions: Table,
}

/// Everything the single pass accumulates
struct PassState<'p, A> {
    tracker: CompletenessTracker<'p>,
    observed: usize,
    global: A,
    /// Indexed `[repeat][fold]`
    cells: Vec<Vec<A>>,
    confusion: ConfusionMatrix,
    missing_truth: usize,
}

/// One evaluation run and the stage it has reached
#[derive(Debug)]
pub struct EvaluationRun<'c> {
    config: &'c EvalConfig,
    stage: Stage,
    failed_at: Option<Stage>,
}

impl<'c> EvaluationRun<'c> {
    pub fn new(config: &'c EvalConfig) -> Self {
        Self {
            config,
            stage: Stage::Initializing,
            failed_at: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Stage that failed, once the run is in `Failed`
    pub fn failed_at(&self) -> Option<Stage> {
        self.failed_at
    }

    /// Run every stage and produce the report
    pub fn execute(&mut self, source: InputSource, target: &str) -> Result<EvaluationReport> {
        let result = self.run_to_report(source, target);
        self.finish(result)
    }

    /// Run through the completeness check without building a report
    pub fn check(&mut self, source: InputSource, target: &str) -> Result<CheckSummary> {
        let result = self.run_to_check(source, target);
        self.finish(result)
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.advance(Stage::Done);
                Ok(value)
            }
            Err(err) => {
                debug!(stage = %self.stage, code = err.code(), "evaluation failed");
                self.failed_at = Some(self.stage);
                self.stage = Stage::Failed;
                Err(err)
            }
        }
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }

    fn run_to_report(&mut self, source: InputSource, target: &str) -> Result<EvaluationReport> {
        let inputs = self.initialize(source, target)?;
        let columns = self.validate_schema(&inputs)?;
        let priors = Priors::from_dataset(&inputs.dataset);
        let task = inputs.dataset.task();
        let num_classes = inputs.dataset.num_classes();
        let state = self.single_pass(&inputs, &columns, || {
            ScoreAccumulator::with_priors(task, num_classes, priors.clone())
        })?;
        self.completeness_check(&state)?;

        self.advance(Stage::Aggregating);
        let global = state.global.snapshot(num_classes, task);
        let cells: Vec<Vec<MetricSnapshot>> = state
            .cells
            .iter()
            .map(|folds| folds.iter().map(|acc| acc.snapshot(num_classes, task)).collect())
            .collect();
        let mut population = MetricCollector::new();
        for snapshot in cells.iter().flatten() {
            population.add(snapshot);
        }

        self.advance(Stage::Reporting);
        let report =
            EvaluationReport::new(&inputs.dataset, &state.confusion, &global, &cells, &population);
        info!(
            task = %task,
            predictions = state.observed,
            cells = population.len(),
            "evaluation complete"
        );
        Ok(report)
    }

    fn run_to_check(&mut self, source: InputSource, target: &str) -> Result<CheckSummary> {
        let inputs = self.initialize(source, target)?;
        let columns = self.validate_schema(&inputs)?;
        let priors = Priors::from_dataset(&inputs.dataset);
        let task = inputs.dataset.task();
        let num_classes = inputs.dataset.num_classes();
        let state = self.single_pass(&inputs, &columns, || {
            ScoreAccumulator::with_priors(task, num_classes, priors.clone())
        })?;
        self.completeness_check(&state)?;

        Ok(CheckSummary {
            task,
            target: inputs.dataset.target_name().to_string(),
            instances: inputs.dataset.num_instances(),
            repeats: inputs.plan.repeats(),
            folds: inputs.plan.folds(),
            expected: inputs.plan.len(),
            observed: state.observed,
        })
    }

    fn initialize(&mut self, source: InputSource, target: &str) -> Result<Inputs> {
        let (dataset, splits, predictions) = source.into_tables()?;
        let dataset = Dataset::new(dataset, target)?;
        let plan =
            SplitPlan::from_table(&splits, &self.config.splits, dataset.num_instances())?;
        debug!(
            instances = dataset.num_instances(),
            task = %dataset.task(),
            repeats = plan.repeats(),
            folds = plan.folds(),
            expected = plan.len(),
            "inputs loaded"
        );
        Ok(Inputs {
            dataset,
            plan,
            predictions,
        })
    }

    fn validate_schema(&mut self, inputs: &Inputs) -> Result<PredictionColumns> {
        self.advance(Stage::ValidatingSchema);
        PredictionColumns::resolve(&inputs.predictions, &inputs.dataset, &self.config.predictions)
    }

    fn single_pass<'p, A, F>(
        &mut self,
        inputs: &'p Inputs,
        columns: &PredictionColumns,
        new_accumulator: F,
    ) -> Result<PassState<'p, A>>
    where
        A: MetricAccumulator,
        F: Fn() -> A,
    {
        self.advance(Stage::SinglePass);
        let Inputs {
            dataset,
            plan,
            predictions,
        } = inputs;

        let mut state = PassState {
            tracker: CompletenessTracker::new(plan)
                .with_report_limit(self.config.max_reported_keys),
            observed: 0,
            global: new_accumulator(),
            cells: (0..plan.repeats())
                .map(|_| (0..plan.folds()).map(|_| new_accumulator()).collect())
                .collect(),
            confusion: ConfusionMatrix::new(dataset.num_classes()),
            missing_truth: 0,
        };

        for index in 0..predictions.num_rows() {
            let record = columns.record(predictions, index, dataset)?;
            let key = record.key;
            if key.row_id >= dataset.num_instances() {
                return Err(EvalError::RowOutOfRange {
                    table: "Predictions",
                    record: index,
                    row_id: key.row_id,
                    dataset_size: dataset.num_instances(),
                });
            }
            state.tracker.record(key);
            state.observed += 1;

            observe(&mut state.global, &record, dataset)?;
            if let Some(cell) = state
                .cells
                .get_mut(key.repeat)
                .and_then(|folds| folds.get_mut(key.fold))
            {
                observe(cell, &record, dataset)?;
            }

            match (dataset.task(), &record.predicted) {
                (Task::Classification, Predicted::Class(predicted)) => {
                    match (dataset.class_index(key.row_id), predicted) {
                        (Some(actual), Some(predicted)) => {
                            state.confusion.add(actual, *predicted);
                        }
                        (None, _) => state.missing_truth += 1,
                        (Some(_), None) => {}
                    }
                }
                _ => {
                    if dataset.target_value(key.row_id).is_none() {
                        state.missing_truth += 1;
                    }
                }
            }
        }

        if state.missing_truth > 0 {
            warn!(
                count = state.missing_truth,
                "predictions for instances without ground truth were not scored"
            );
        }
        debug!(predictions = state.observed, "single pass finished");
        Ok(state)
    }

    fn completeness_check<A>(&mut self, state: &PassState<'_, A>) -> Result<()> {
        self.advance(Stage::CompletenessCheck);
        state.tracker.check()?;
        debug!(observed = state.observed, "predictions cover the split plan");
        Ok(())
    }
}

/// Feed one record to an accumulator
fn observe<A: MetricAccumulator + ?Sized>(
    accumulator: &mut A,
    record: &PredictionRecord,
    dataset: &Dataset,
) -> Result<()> {
    let row = record.key.row_id;
    match &record.predicted {
        Predicted::Class(_) => {
            accumulator.observe_classification(&record.confidences, dataset.class_index(row))
        }
        Predicted::Value(value) => accumulator.observe_regression(*value, dataset.target_value(row)),
    }
}

/// Scores prediction files against a dataset and its split plan
#[derive(Clone, Debug, Default)]
pub struct PredictionEvaluator {
    config: EvalConfig,
}

impl PredictionEvaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate predictions and return the full report
    pub fn evaluate(&self, source: InputSource, target: &str) -> Result<EvaluationReport> {
        EvaluationRun::new(&self.config).execute(source, target)
    }

    /// Evaluate three ARFF files
    pub fn evaluate_files(
        &self,
        dataset: impl AsRef<Path>,
        splits: impl AsRef<Path>,
        predictions: impl AsRef<Path>,
        target: &str,
    ) -> Result<EvaluationReport> {
        let source = InputSource::locations(
            dataset.as_ref(),
            splits.as_ref(),
            predictions.as_ref(),
        );
        self.evaluate(source, target)
    }

    /// Validate inputs and completeness only
    pub fn check(&self, source: InputSource, target: &str) -> Result<CheckSummary> {
        EvaluationRun::new(&self.config).check(source, target)
    }
}

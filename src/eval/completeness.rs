//! Completeness tracking
//!
//! Prediction files are generated outside this crate, so every expected
//! (repeat, fold, row) key must be predicted exactly once and nothing else may
//! appear. Recording never fails; [`CompletenessTracker::check`] reports every
//! gap, duplicate and stray key at the end of the pass.

use crate::data::{SplitKey, SplitPlan};
use crate::error::{EvalError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Default number of keys listed per category
pub const DEFAULT_REPORT_LIMIT: usize = 10;

/// Outcome of a completeness check
///
/// Counts are totals; key lists hold at most the configured number of
/// examples, ordered by (repeat, fold, row_id).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CompletenessDiagnostic {
    /// Keys in the split plan
    pub expected: usize,
    /// Predictions recorded
    pub observed: usize,
    pub missing_count: usize,
    pub duplicated_count: usize,
    pub unexpected_count: usize,
    pub missing: Vec<SplitKey>,
    /// Duplicated keys with their observed count
    pub duplicated: Vec<(SplitKey, usize)>,
    pub unexpected: Vec<SplitKey>,
}

impl CompletenessDiagnostic {
    /// Whether the predictions cover the plan exactly
    pub fn is_complete(&self) -> bool {
        self.missing_count == 0 && self.duplicated_count == 0 && self.unexpected_count == 0
    }
}

fn write_keys<T>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    keys: &[T],
    total: usize,
    render: impl Fn(&T) -> String,
) -> fmt::Result {
    if total == 0 {
        return Ok(());
    }
    let listed: Vec<String> = keys.iter().map(render).collect();
    write!(f, "\n  {label}: {}", listed.join(", "))?;
    if total > keys.len() {
        write!(f, " ... and {} more", total - keys.len())?;
    }
    Ok(())
}

impl fmt::Display for CompletenessDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} missing, {} duplicated, {} unexpected (expected {} predictions, observed {})",
            self.missing_count,
            self.duplicated_count,
            self.unexpected_count,
            self.expected,
            self.observed
        )?;
        write_keys(f, "missing", &self.missing, self.missing_count, |k| k.to_string())?;
        write_keys(f, "duplicated", &self.duplicated, self.duplicated_count, |(k, n)| {
            format!("{k} x{n}")
        })?;
        write_keys(f, "unexpected", &self.unexpected, self.unexpected_count, |k| {
            k.to_string()
        })
    }
}

/// Per-key prediction counter checked against a split plan
#[derive(Debug)]
pub struct CompletenessTracker<'a> {
    plan: &'a SplitPlan,
    counts: BTreeMap<SplitKey, usize>,
    observed: usize,
    report_limit: usize,
}

impl<'a> CompletenessTracker<'a> {
    /// Create an empty tracker for `plan`
    pub fn new(plan: &'a SplitPlan) -> Self {
        Self {
            plan,
            counts: BTreeMap::new(),
            observed: 0,
            report_limit: DEFAULT_REPORT_LIMIT,
        }
    }

    /// Limit the keys listed per category in diagnostics
    pub fn with_report_limit(mut self, limit: usize) -> Self {
        self.report_limit = limit;
        self
    }

    /// Count one prediction for `key`
    pub fn record(&mut self, key: SplitKey) {
        *self.counts.entry(key).or_insert(0) += 1;
        self.observed += 1;
    }

    /// Times `key` has been recorded
    pub fn count(&self, key: &SplitKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Total predictions recorded
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Compare recorded counts with the plan
    pub fn diagnose(&self) -> CompletenessDiagnostic {
        let limit = self.report_limit;
        let mut diagnostic = CompletenessDiagnostic {
            expected: self.plan.len(),
            observed: self.observed,
            ..Default::default()
        };

        for key in self.plan.expected() {
            if self.count(key) == 0 {
                diagnostic.missing_count += 1;
                if diagnostic.missing.len() < limit {
                    diagnostic.missing.push(*key);
                }
            }
        }

        for (key, &count) in &self.counts {
            if !self.plan.contains(key) {
                diagnostic.unexpected_count += 1;
                if diagnostic.unexpected.len() < limit {
                    diagnostic.unexpected.push(*key);
                }
            } else if count > 1 {
                diagnostic.duplicated_count += 1;
                if diagnostic.duplicated.len() < limit {
                    diagnostic.duplicated.push((*key, count));
                }
            }
        }

        diagnostic
    }

    /// Succeed only if every expected key was recorded exactly once and
    /// nothing outside the plan was recorded
    pub fn check(&self) -> Result<()> {
        let diagnostic = self.diagnose();
        if diagnostic.is_complete() {
            Ok(())
        } else {
            Err(EvalError::Completeness(diagnostic))
        }
    }
}

//! Split plan: the expected (repeat, fold, row) held-out assignments

use super::parse_identifier;
use crate::config::SplitColumnNames;
use crate::error::{EvalError, Result};
use crate::io::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const TABLE: &str = "Splits";

/// Identity of one held-out prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SplitKey {
    pub repeat: usize,
    pub fold: usize,
    pub row_id: usize,
}

impl SplitKey {
    pub fn new(repeat: usize, fold: usize, row_id: usize) -> Self {
        Self {
            repeat,
            fold,
            row_id,
        }
    }
}

impl fmt::Display for SplitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(repeat={}, fold={}, row_id={})",
            self.repeat, self.fold, self.row_id
        )
    }
}

/// Expected completeness set plus the repeat x fold grid it spans
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPlan {
    repeats: usize,
    folds: usize,
    expected: BTreeSet<SplitKey>,
}

impl SplitPlan {
    /// Build a plan from held-out keys; the grid spans the largest indexes seen
    pub fn new(keys: impl IntoIterator<Item = SplitKey>) -> Self {
        let expected: BTreeSet<SplitKey> = keys.into_iter().collect();
        let repeats = expected.iter().map(|k| k.repeat.saturating_add(1)).max().unwrap_or(0);
        let folds = expected.iter().map(|k| k.fold.saturating_add(1)).max().unwrap_or(0);
        Self {
            repeats,
            folds,
            expected,
        }
    }

    /// Plain `repeats` x `folds` cross-validation over `n_rows` rows
    ///
    /// Folds are contiguous blocks after an optional seeded shuffle per repeat;
    /// the first `n_rows % folds` folds receive one extra row.
    pub fn cross_validation(n_rows: usize, repeats: usize, folds: usize, seed: Option<u64>) -> Self {
        let mut expected = BTreeSet::new();
        if folds == 0 {
            return Self::new(expected);
        }

        for repeat in 0..repeats {
            let mut indices: Vec<usize> = (0..n_rows).collect();
            if let Some(seed) = seed {
                // LCG shuffle, reproducible across platforms
                let mut rng_state = seed.wrapping_add(repeat as u64);
                for i in (1..n_rows).rev() {
                    rng_state = rng_state
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1);
                    let j = (rng_state >> 33) as usize % (i + 1);
                    indices.swap(i, j);
                }
            }

            let fold_size = n_rows / folds;
            let remainder = n_rows % folds;
            let mut start = 0;
            for fold in 0..folds {
                let end = start + fold_size + usize::from(fold < remainder);
                for &row_id in &indices[start..end] {
                    expected.insert(SplitKey::new(repeat, fold, row_id));
                }
                start = end;
            }
        }

        Self {
            repeats,
            folds,
            expected,
        }
    }

    /// Read a split table; only rows marked as test rows are expected
    ///
    /// The grid spans every row of the table, train rows included, so a fold
    /// without test rows still gets its own cell. Every cell needs at least
    /// one row of the table; a larger grid is rejected before anything is
    /// allocated for it.
    pub fn from_table(table: &Table, columns: &SplitColumnNames, dataset_size: usize) -> Result<Self> {
        let column = |name: &str| {
            table.attribute_index(name).ok_or_else(|| EvalError::MissingColumn {
                table: TABLE,
                column: name.to_string(),
            })
        };
        let type_col = column(&columns.type_column)?;
        let row_col = columns
            .row_id
            .iter()
            .find_map(|name| table.attribute_index(name))
            .ok_or_else(|| EvalError::MissingColumn {
                table: TABLE,
                column: columns.row_id.join(" or "),
            })?;
        let repeat_col = column(&columns.repeat)?;
        let fold_col = column(&columns.fold)?;

        let mut repeats = 0;
        let mut folds = 0;
        let mut expected = BTreeSet::new();

        for (record, row) in table.rows().iter().enumerate() {
            let invalid = |col: usize| {
                let attribute = table.attribute(col);
                EvalError::InvalidIdentifier {
                    table: TABLE,
                    record,
                    column: attribute.name.clone(),
                    value: row[col].render(attribute),
                }
            };
            let id = |col: usize| {
                parse_identifier(&row[col], table.attribute(col).labels())
                    .ok_or_else(|| invalid(col))
            };
            let key = SplitKey::new(id(repeat_col)?, id(fold_col)?, id(row_col)?);
            let repeat_end = key.repeat.checked_add(1).ok_or_else(|| invalid(repeat_col))?;
            let fold_end = key.fold.checked_add(1).ok_or_else(|| invalid(fold_col))?;
            repeats = repeats.max(repeat_end);
            folds = folds.max(fold_end);

            let type_attr = table.attribute(type_col);
            let is_test = row[type_col]
                .as_label(type_attr)
                .is_some_and(|label| label.eq_ignore_ascii_case(&columns.test_marker));
            if !is_test {
                continue;
            }
            if key.row_id >= dataset_size {
                return Err(EvalError::RowOutOfRange {
                    table: TABLE,
                    record,
                    row_id: key.row_id,
                    dataset_size,
                });
            }
            expected.insert(key);
        }

        let rows = table.num_rows();
        if repeats.checked_mul(folds).map_or(true, |cells| cells > rows) {
            return Err(EvalError::GridTooLarge {
                repeats,
                folds,
                rows,
            });
        }

        Ok(Self {
            repeats,
            folds,
            expected,
        })
    }

    pub fn repeats(&self) -> usize {
        self.repeats
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    /// Every expected key, ordered by (repeat, fold, row_id)
    pub fn expected(&self) -> &BTreeSet<SplitKey> {
        &self.expected
    }

    pub fn contains(&self, key: &SplitKey) -> bool {
        self.expected.contains(key)
    }

    /// Number of expected predictions
    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }
}

//! Labeled dataset with a resolved target attribute

use crate::error::{EvalError, Result};
use crate::io::{AttributeKind, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Learning task implied by the target attribute type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    /// Nominal target
    Classification,
    /// Numeric target
    Regression,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Classification => write!(f, "classification"),
            Task::Regression => write!(f, "regression"),
        }
    }
}

/// Dataset whose target attribute has been resolved once at load time
#[derive(Clone, Debug)]
pub struct Dataset {
    table: Table,
    target: usize,
    task: Task,
}

impl Dataset {
    /// Resolve `target` by exact attribute name and derive the task
    pub fn new(table: Table, target: &str) -> Result<Self> {
        let index = table
            .attribute_index(target)
            .ok_or_else(|| EvalError::MissingTarget {
                name: target.to_string(),
                available: table.attributes().iter().map(|a| a.name.clone()).collect(),
            })?;

        let attribute = table.attribute(index);
        let task = match &attribute.kind {
            AttributeKind::Nominal(_) => Task::Classification,
            AttributeKind::Numeric => Task::Regression,
            other => {
                return Err(EvalError::Task {
                    attribute: attribute.name.clone(),
                    kind: other.type_name().to_string(),
                })
            }
        };

        Ok(Self {
            table,
            target: index,
            task,
        })
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn num_instances(&self) -> usize {
        self.table.num_rows()
    }

    pub fn target_name(&self) -> &str {
        &self.table.attribute(self.target).name
    }

    /// Class labels in declaration order; empty for regression
    pub fn class_labels(&self) -> &[String] {
        self.table.attribute(self.target).labels()
    }

    /// Number of classes; 0 for regression
    pub fn num_classes(&self) -> usize {
        self.class_labels().len()
    }

    /// Class index of `row`, `None` when the label is missing
    pub fn class_index(&self, row: usize) -> Option<usize> {
        match self.table.value(row, self.target) {
            crate::io::Value::Nominal(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric target of `row`, `None` when missing
    pub fn target_value(&self, row: usize) -> Option<f64> {
        self.table.value(row, self.target).as_f64()
    }

    /// Target values of every instance, in row order
    pub fn targets(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        (0..self.num_instances()).map(move |row| self.target_value(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Attribute, Value};

    fn table() -> Table {
        let mut table = Table::new(
            "toy",
            vec![
                Attribute::numeric("x"),
                Attribute::nominal("class", ["A", "B"]),
                Attribute::string("note"),
            ],
        );
        table
            .push_row(vec![Value::Number(1.0), Value::Nominal(1), Value::Text("n".into())])
            .unwrap();
        table
            .push_row(vec![Value::Number(2.0), Value::Missing, Value::Text("m".into())])
            .unwrap();
        table
    }

    #[test]
    fn test_nominal_target_is_classification() {
        let dataset = Dataset::new(table(), "class").unwrap();
        assert_eq!(dataset.task(), Task::Classification);
        assert_eq!(dataset.num_classes(), 2);
        assert_eq!(dataset.class_index(0), Some(1));
        assert_eq!(dataset.class_index(1), None);
        assert_eq!(dataset.target_name(), "class");
    }

    #[test]
    fn test_numeric_target_is_regression() {
        let dataset = Dataset::new(table(), "x").unwrap();
        assert_eq!(dataset.task(), Task::Regression);
        assert_eq!(dataset.num_classes(), 0);
        assert_eq!(dataset.targets().collect::<Vec<_>>(), vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_missing_target_is_schema_error() {
        let err = Dataset::new(table(), "label").unwrap_err();
        assert!(matches!(err, EvalError::MissingTarget { .. }));
        assert!(err.to_string().contains("x, class, note"));
    }

    #[test]
    fn test_string_target_is_task_error() {
        let err = Dataset::new(table(), "note").unwrap_err();
        assert!(matches!(err, EvalError::Task { .. }));
    }

    #[test]
    fn test_task_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Task::Classification).unwrap(),
            "\"classification\""
        );
        assert_eq!(Task::Regression.to_string(), "regression");
    }
}

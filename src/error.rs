//! Error types with actionable diagnostics.
//!
//! Every failure in an evaluation run is a data-integrity problem in one of the
//! input artifacts, so every variant is fatal: the run aborts and no partial
//! report is produced.

use crate::eval::CompletenessDiagnostic;
use thiserror::Error;

/// Result type alias for evaluar operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Coarse error category, one per failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Target attribute or a required column is absent
    Schema,
    /// A record references an identifier outside its valid range
    Range,
    /// Predictions do not exactly cover the split plan
    Completeness,
    /// Target type is neither nominal nor numeric
    Task,
    /// Reading or decoding an input file failed
    Input,
    /// Configuration is invalid
    Config,
}

/// Errors that can occur while evaluating a prediction file.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Target attribute not present in the dataset.
    #[error("Class attribute ({name}) not found in dataset\n  → Available attributes: {}", .available.join(", "))]
    MissingTarget { name: String, available: Vec<String> },

    /// Required identifying column absent from a table.
    #[error("{table} file lacks attribute {column}")]
    MissingColumn { table: &'static str, column: String },

    /// No confidence column for one of the dataset's class labels.
    #[error("Attribute {column} not found among predictions\n  → Expected one confidence column per class label (class '{label}')")]
    MissingConfidence { label: String, column: String },

    /// Column present but of an unusable type.
    #[error("{table} attribute {column} has type {found}, expected {expected}")]
    ColumnType {
        table: &'static str,
        column: String,
        expected: &'static str,
        found: String,
    },

    /// Record references a row outside the dataset.
    #[error("{table} record {record} references row_id {row_id} (0-based) while dataset has only {dataset_size} instances")]
    RowOutOfRange {
        table: &'static str,
        record: usize,
        row_id: usize,
        dataset_size: usize,
    },

    /// Identifier value is missing, negative or fractional.
    #[error("{table} record {record}: invalid {column} value '{value}' (expected a non-negative integer)")]
    InvalidIdentifier {
        table: &'static str,
        record: usize,
        column: String,
        value: String,
    },

    /// Repeat and fold identifiers span more cells than the split table has rows.
    #[error("Splits table spans {repeats} repeat(s) x {folds} fold(s) but has only {rows} rows\n  → Repeat and fold identifiers must be dense, starting at 0")]
    GridTooLarge {
        repeats: usize,
        folds: usize,
        rows: usize,
    },

    /// Predicted label is not one of the dataset's class labels.
    #[error("Prediction record {record}: label '{label}' is not a class of the target attribute")]
    UnknownLabel { record: usize, label: String },

    /// Predictions do not exactly cover the split plan.
    #[error("Prediction count does not match: {0}")]
    Completeness(CompletenessDiagnostic),

    /// Target attribute is neither nominal nor numeric.
    #[error("Task not defined: target attribute {attribute} has type {kind}\n  → Use a nominal (classification) or numeric (regression) target")]
    Task { attribute: String, kind: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Remote input could not be downloaded.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Malformed tabular input.
    #[error("Parse error in {source_name} at line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Report serialization failed.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Broken internal invariant.
    #[error("Internal error: {message}\n  → This is a bug in evaluar, not in the input files")]
    Internal { message: String },
}

impl EvalError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Category of the failed check.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingTarget { .. }
            | Self::MissingColumn { .. }
            | Self::MissingConfidence { .. }
            | Self::ColumnType { .. } => ErrorKind::Schema,
            Self::RowOutOfRange { .. }
            | Self::InvalidIdentifier { .. }
            | Self::GridTooLarge { .. }
            | Self::UnknownLabel { .. } => ErrorKind::Range,
            Self::Completeness(_) => ErrorKind::Completeness,
            Self::Task { .. } | Self::Internal { .. } => ErrorKind::Task,
            Self::Io { .. }
            | Self::Fetch { .. }
            | Self::Parse { .. }
            | Self::Serialization { .. } => ErrorKind::Input,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTarget { .. } => "E100",
            Self::MissingColumn { .. } => "E101",
            Self::MissingConfidence { .. } => "E102",
            Self::ColumnType { .. } => "E103",
            Self::RowOutOfRange { .. } => "E200",
            Self::InvalidIdentifier { .. } => "E201",
            Self::UnknownLabel { .. } => "E202",
            Self::GridTooLarge { .. } => "E203",
            Self::Completeness(_) => "E300",
            Self::Task { .. } => "E400",
            Self::Io { .. } => "E500",
            Self::Parse { .. } => "E501",
            Self::Config { .. } => "E502",
            Self::Serialization { .. } => "E503",
            Self::Fetch { .. } => "E504",
            Self::Internal { .. } => "E999",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let errors = vec![
            EvalError::MissingTarget { name: "".into(), available: vec![] },
            EvalError::MissingColumn { table: "Predictions", column: "".into() },
            EvalError::MissingConfidence { label: "".into(), column: "".into() },
            EvalError::ColumnType {
                table: "Predictions",
                column: "".into(),
                expected: "numeric",
                found: "string".into(),
            },
            EvalError::RowOutOfRange { table: "Predictions", record: 0, row_id: 0, dataset_size: 0 },
            EvalError::InvalidIdentifier {
                table: "Predictions",
                record: 0,
                column: "".into(),
                value: "".into(),
            },
            EvalError::UnknownLabel { record: 0, label: "".into() },
            EvalError::GridTooLarge { repeats: 0, folds: 0, rows: 0 },
            EvalError::Completeness(CompletenessDiagnostic::default()),
            EvalError::Task { attribute: "".into(), kind: "".into() },
            EvalError::Parse { source_name: "".into(), line: 0, message: "".into() },
            EvalError::config(""),
            EvalError::Serialization { message: "".into() },
            EvalError::Fetch { url: "".into(), message: "".into() },
            EvalError::Internal { message: "".into() },
        ];

        let codes: Vec<_> = errors.iter().map(EvalError::code).collect();
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_kinds_follow_code_families() {
        let range = EvalError::RowOutOfRange { table: "Predictions", record: 3, row_id: 4, dataset_size: 4 };
        assert_eq!(range.kind(), ErrorKind::Range);
        assert!(range.code().starts_with("E2"));

        let schema = EvalError::MissingColumn { table: "Predictions", column: "row_id".into() };
        assert_eq!(schema.kind(), ErrorKind::Schema);
        assert!(schema.code().starts_with("E1"));
    }

    #[test]
    fn test_messages_name_offending_identifiers() {
        let err = EvalError::RowOutOfRange { table: "Predictions", record: 7, row_id: 4, dataset_size: 4 };
        let msg = err.to_string();
        assert!(msg.contains("row_id 4"));
        assert!(msg.contains("only 4 instances"));

        let err = EvalError::MissingConfidence {
            label: "Iris-setosa".into(),
            column: "confidence.Iris-setosa".into(),
        };
        assert!(err.to_string().contains("confidence.Iris-setosa"));

        let err = EvalError::MissingTarget {
            name: "class".into(),
            available: vec!["a".into(), "b".into()],
        };
        assert!(err.to_string().contains("(class)"));
        assert!(err.to_string().contains("a, b"));
    }

    #[test]
    fn test_internal_error_points_at_the_tool() {
        let msg = EvalError::Internal { message: "state lost".into() }.to_string();
        assert!(msg.contains("state lost"));
        assert!(msg.contains("bug in evaluar"));
        assert!(!msg.contains("http"));
    }

    #[test]
    fn test_grid_too_large_names_dimensions() {
        let err = EvalError::GridTooLarge { repeats: 1_000_000_001, folds: 2, rows: 9 };
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(err.to_string().contains("1000000001 repeat(s) x 2 fold(s)"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = EvalError::io(
            "reading data.arff",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(std::error::Error::source(&err).is_some());
    }
}

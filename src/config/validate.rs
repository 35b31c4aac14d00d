//! Configuration validation

use super::schema::EvalConfig;

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty column name for {0}")]
    EmptyColumnName(&'static str),

    #[error("No candidate column names for {0}")]
    NoCandidates(&'static str),

    #[error("Invalid max_reported_keys: {0} (must be > 0)")]
    InvalidReportLimit(usize),

    #[error("Empty split test marker")]
    EmptyTestMarker,
}

/// Validate an evaluation configuration
///
/// Checks that every column rule names at least one non-empty column and
/// that diagnostics can list at least one key per category.
pub fn validate_config(config: &EvalConfig) -> Result<(), ValidationError> {
    let predictions = &config.predictions;
    let splits = &config.splits;

    for (field, name) in [
        ("predictions.row_id", &predictions.row_id),
        ("predictions.prediction", &predictions.prediction),
        ("predictions.confidence_prefix", &predictions.confidence_prefix),
        ("splits.type_column", &splits.type_column),
        ("splits.repeat", &splits.repeat),
        ("splits.fold", &splits.fold),
    ] {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyColumnName(field));
        }
    }

    for (field, candidates) in [
        ("predictions.repeat", &predictions.repeat),
        ("predictions.fold", &predictions.fold),
        ("splits.row_id", &splits.row_id),
    ] {
        if candidates.is_empty() {
            return Err(ValidationError::NoCandidates(field));
        }
        if candidates.iter().any(|c| c.trim().is_empty()) {
            return Err(ValidationError::EmptyColumnName(field));
        }
    }

    if splits.test_marker.is_empty() {
        return Err(ValidationError::EmptyTestMarker);
    }

    if config.max_reported_keys == 0 {
        return Err(ValidationError::InvalidReportLimit(config.max_reported_keys));
    }

    Ok(())
}

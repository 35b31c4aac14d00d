//! Configuration schema and YAML loading

use super::validate::validate_config;
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Column names expected in the predictions table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionColumnNames {
    /// Row identifier into the dataset
    pub row_id: String,
    /// Repeat column candidates, first match wins
    pub repeat: Vec<String>,
    /// Fold column candidates, first match wins
    pub fold: Vec<String>,
    /// Predicted label or value
    pub prediction: String,
    /// Prefix of the per-class confidence columns
    pub confidence_prefix: String,
}

impl Default for PredictionColumnNames {
    fn default() -> Self {
        Self {
            row_id: "row_id".to_string(),
            repeat: vec!["repeat".to_string(), "repeat_nr".to_string()],
            fold: vec!["fold".to_string(), "fold_nr".to_string()],
            prediction: "prediction".to_string(),
            confidence_prefix: "confidence.".to_string(),
        }
    }
}

impl PredictionColumnNames {
    /// Confidence column name for a class label
    pub fn confidence_column(&self, label: &str) -> String {
        format!("{}{}", self.confidence_prefix, label)
    }
}

/// Column names expected in the split-plan table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitColumnNames {
    /// TRAIN/TEST marker column
    pub type_column: String,
    /// Marker value of held-out rows
    pub test_marker: String,
    /// Row column candidates, first match wins
    pub row_id: Vec<String>,
    pub repeat: String,
    pub fold: String,
}

impl Default for SplitColumnNames {
    fn default() -> Self {
        Self {
            type_column: "type".to_string(),
            test_marker: "TEST".to_string(),
            row_id: vec!["rowid".to_string(), "row_id".to_string()],
            repeat: "repeat".to_string(),
            fold: "fold".to_string(),
        }
    }
}

/// Complete evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Predictions table columns
    pub predictions: PredictionColumnNames,
    /// Split-plan table columns
    pub splits: SplitColumnNames,
    /// Offending keys listed per category in completeness diagnostics
    pub max_reported_keys: usize,
    /// Pretty-print JSON reports
    pub pretty: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            predictions: PredictionColumnNames::default(),
            splits: SplitColumnNames::default(),
            max_reported_keys: 10,
            pretty: true,
        }
    }
}

/// Load and validate an evaluation config from a YAML file
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<EvalConfig> {
    let path = config_path.as_ref();
    let yaml_content = fs::read_to_string(path).map_err(|e| {
        EvalError::config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config: EvalConfig = serde_yaml::from_str(&yaml_content)
        .map_err(|e| EvalError::config(format!("Failed to parse YAML config: {e}")))?;

    validate_config(&config).map_err(|e| EvalError::config(e.to_string()))?;

    Ok(config)
}

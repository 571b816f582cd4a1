//! Prediction-results file loading.
//!
//! The file is a JSON list of `{image, prompt, model_output}` records, one
//! per evaluated case, grouped contiguously by level (see
//! [`crate::config`]). Unknown fields are ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use floe_kernel::answer::extract_actions;

use crate::error::{io_error, parse_error, EvalError};

/// Default directory holding results files.
pub const DEFAULT_PREFIX: &str = "frozenlake";

/// One model prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub prompt: String,
    pub model_output: String,
}

impl PredictionRecord {
    /// Move tokens inside the `<ANSWER>` markers of `model_output`.
    #[must_use]
    pub fn actions(&self) -> Vec<&str> {
        extract_actions(&self.model_output)
    }
}

/// Resolve a results-file name to `<prefix>/<name>.json`.
///
/// `.json` is appended only when the name does not already end in it.
#[must_use]
pub fn resolve_results_path(prefix: &Path, name: &str) -> PathBuf {
    if Path::new(name).extension().is_some_and(|ext| ext == "json") {
        prefix.join(name)
    } else {
        prefix.join(format!("{name}.json"))
    }
}

/// Parse the contents of a prediction-results file.
///
/// # Errors
///
/// Returns [`EvalError::Parse`] if the bytes are not a list of records.
pub fn parse_predictions(path: &Path, bytes: &[u8]) -> Result<Vec<PredictionRecord>, EvalError> {
    serde_json::from_slice(bytes).map_err(|e| parse_error(path, &e))
}

/// Read and parse a prediction-results file.
///
/// # Errors
///
/// Returns [`EvalError::Io`] if the file cannot be read, or
/// [`EvalError::Parse`] if it is malformed.
pub fn load_predictions(path: &Path) -> Result<Vec<PredictionRecord>, EvalError> {
    let bytes = std::fs::read(path).map_err(|e| io_error(path, &e))?;
    parse_predictions(path, &bytes)
}

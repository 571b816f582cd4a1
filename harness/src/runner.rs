//! Batch runner: load artifacts, then score.
//!
//! # Pipeline
//!
//! ```text
//! EvalConfig::resolve() → load_levels(data_dir) → load_predictions(results)
//!   → evaluate(levels, predictions, layout)
//! ```
//!
//! Any failure aborts the run; there is no partial result.

use std::path::Path;

use tracing::info;

use crate::config::EvalConfig;
use crate::dataset::{load_levels, LevelData};
use crate::error::EvalError;
use crate::predictions::load_predictions;
use crate::scoring::{evaluate, Evaluation};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct BatchRun {
    /// Loaded ground truth, kept for follow-up passes such as the audit.
    pub levels: Vec<LevelData>,
    pub evaluation: Evaluation,
}

/// Run a full evaluation.
///
/// # Errors
///
/// Returns the first [`EvalError`] from config resolution, artifact loading,
/// or scoring.
pub fn run(
    data_dir: &Path,
    results_path: &Path,
    config: &EvalConfig,
) -> Result<BatchRun, EvalError> {
    let layout = config.resolve()?;
    let levels = load_levels(data_dir)?;
    let predictions = load_predictions(results_path)?;
    info!(
        data_dir = %data_dir.display(),
        results = %results_path.display(),
        levels = levels.len(),
        records = predictions.len(),
        "artifacts loaded"
    );
    let evaluation = evaluate(&levels, &predictions, &layout)?;
    Ok(BatchRun { levels, evaluation })
}

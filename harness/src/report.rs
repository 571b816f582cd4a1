//! Evaluation report: a canonical JSON record of a scored batch.
//!
//! # Shape (`floe.eval_report.v1`)
//!
//! ```text
//! {
//!   "schema_version": "floe.eval_report.v1",
//!   "results_file": "<name>",
//!   "layout": {"range_start", "range_end", "block_size"},
//!   "levels": [{"level", "side", "correct", "total", "accuracy_ppm",
//!               "cases": [{"index", "correct", "failure", "failure_detail",
//!                          "path_len", "true_distance", "final_state", "actions"}]}],
//!   "overall": {"correct", "total", "mean_accuracy_ppm"}
//! }
//! ```
//!
//! Accuracies are integer parts-per-million so the bytes stay canonical.
//! The digest covers the canonical bytes under [`DOMAIN_EVAL_REPORT`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::canon::{
    canonical_hash, canonical_json_bytes, CanonError, ContentHash, DOMAIN_EVAL_REPORT,
};
use crate::scoring::{CaseOutcome, Evaluation, LevelScore};

/// Schema tag written into every report.
pub const REPORT_SCHEMA_VERSION: &str = "floe.eval_report.v1";

/// In-memory report: canonical bytes plus their digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalReportV1 {
    pub bytes: Vec<u8>,
    pub digest: ContentHash,
}

/// Error building or writing a report.
#[derive(Debug)]
pub enum ReportError {
    /// Canonical JSON serialization failed.
    Canon(CanonError),
    /// Writing the report file failed.
    Io { path: PathBuf, detail: String },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canon(e) => write!(f, "report serialization failed: {e}"),
            Self::Io { path, detail } => {
                write!(f, "writing report {} failed: {detail}", path.display())
            }
        }
    }
}

impl std::error::Error for ReportError {}

/// `correct / total` in parts per million (0 for an empty total).
#[must_use]
pub fn accuracy_ppm(correct: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        correct * 1_000_000 / total
    }
}

fn case_json(outcome: &CaseOutcome) -> serde_json::Value {
    let v = &outcome.verdict;
    json!({
        "index": outcome.index,
        "correct": v.is_correct(),
        "failure": v.failure.map(|f| f.label()),
        "failure_detail": v.failure.map(|f| f.to_string()),
        "path_len": v.path_len,
        "true_distance": v.true_distance,
        "final_state": v.final_state,
        "actions": outcome.actions,
    })
}

fn level_json(score: &LevelScore) -> serde_json::Value {
    let t = &score.tally;
    json!({
        "level": t.level,
        "side": t.side,
        "correct": t.correct,
        "total": t.total,
        "accuracy_ppm": accuracy_ppm(t.correct, t.total),
        "cases": score.outcomes.iter().map(case_json).collect::<Vec<_>>(),
    })
}

/// Build the canonical report for a scored batch.
///
/// `results_file` is recorded as given; pass a bare name, not a path, so
/// the digest does not depend on the working directory.
///
/// # Errors
///
/// Returns [`ReportError::Canon`] if canonical serialization fails.
pub fn build_report(
    results_file: &str,
    evaluation: &Evaluation,
) -> Result<EvalReportV1, ReportError> {
    let totals = &evaluation.totals;
    let level_ppms: Vec<u64> = totals
        .levels
        .iter()
        .map(|t| accuracy_ppm(t.correct, t.total))
        .collect();
    let mean_ppm = if level_ppms.is_empty() {
        0
    } else {
        level_ppms.iter().sum::<u64>() / level_ppms.len() as u64
    };

    let value = json!({
        "schema_version": REPORT_SCHEMA_VERSION,
        "results_file": results_file,
        "layout": {
            "range_start": evaluation.layout.cases.start,
            "range_end": evaluation.layout.cases.end,
            "block_size": evaluation.layout.block_size,
        },
        "levels": evaluation.levels.iter().map(level_json).collect::<Vec<_>>(),
        "overall": {
            "correct": totals.correct,
            "total": totals.total,
            "mean_accuracy_ppm": mean_ppm,
        },
    });

    let bytes = canonical_json_bytes(&value).map_err(ReportError::Canon)?;
    let digest = canonical_hash(DOMAIN_EVAL_REPORT, &bytes);
    Ok(EvalReportV1 { bytes, digest })
}

/// Write the report bytes to `path`.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be written.
pub fn write_report(report: &EvalReportV1, path: &Path) -> Result<(), ReportError> {
    std::fs::write(path, &report.bytes).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

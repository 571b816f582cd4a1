//! Reference audit: replay the dataset's own answers through the verifier.
//!
//! Each level directory may hold a `data.json` mapping case index to the
//! reference answer used for training (`{"actions": ...}`). A reference that
//! fails the correctness predicate means the ground truth and the answers
//! disagree. Failing references are findings, not errors; a case whose
//! oracle is itself inconsistent is still fatal.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use floe_kernel::answer::answer_span;
use floe_kernel::verdict::{verify, CaseFailure};

use crate::canon::{canonical_hash, canonical_json_bytes, ContentHash, DOMAIN_AUDIT_REPORT};
use crate::dataset::LevelData;
use crate::error::{index_unique, io_error, parse_error, EvalError};
use crate::report::ReportError;

/// Per-level reference answers file.
pub const REFERENCE_FILENAME: &str = "data.json";

/// A reference answer: free text (optionally in `<ANSWER>` markers) or a
/// token list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ReferenceActionsV1 {
    Text(String),
    Tokens(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
struct ReferenceRecordV1 {
    actions: ReferenceActionsV1,
}

/// Move tokens of a textual reference answer.
///
/// Uses the `<ANSWER>` span when both markers are present, otherwise the
/// whole text.
#[must_use]
pub fn reference_tokens(text: &str) -> Vec<&str> {
    answer_span(text).unwrap_or(text).split_whitespace().collect()
}

/// Audit result for one level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelAudit {
    pub level: String,
    pub checked: u64,
    pub passed: u64,
    /// Reference indices with no distance-map entry.
    pub unmatched: Vec<u32>,
    /// References that fail the correctness predicate.
    pub findings: Vec<(u32, CaseFailure)>,
}

/// Parse a `data.json` file into token lists keyed by case index.
///
/// # Errors
///
/// Returns [`EvalError::Parse`] for malformed JSON,
/// [`EvalError::CaseKey`] for a non-numeric index, and
/// [`EvalError::DuplicateCase`] for two keys naming the same index.
pub fn parse_references(
    path: &Path,
    bytes: &[u8],
) -> Result<BTreeMap<u32, Vec<String>>, EvalError> {
    let raw: BTreeMap<String, ReferenceRecordV1> =
        serde_json::from_slice(bytes).map_err(|e| parse_error(path, &e))?;
    let entries = raw.into_iter().map(|(key, record)| {
        let index: u32 = key.trim().parse().map_err(|_| EvalError::CaseKey {
            path: path.to_path_buf(),
            key: key.clone(),
        })?;
        let tokens = match record.actions {
            ReferenceActionsV1::Text(text) => reference_tokens(&text)
                .into_iter()
                .map(str::to_owned)
                .collect(),
            ReferenceActionsV1::Tokens(tokens) => tokens,
        };
        Ok::<_, EvalError>((index, tokens))
    });
    index_unique(path, entries)
}

/// Replay every reference answer of `level` against its oracle.
///
/// # Errors
///
/// Returns [`EvalError::GroundTruth`] if a referenced case has a start state
/// outside the grid or missing from its oracle.
pub fn audit_references(
    level: &LevelData,
    references: &BTreeMap<u32, Vec<String>>,
) -> Result<LevelAudit, EvalError> {
    let mut audit = LevelAudit {
        level: level.name.clone(),
        ..LevelAudit::default()
    };
    for (&index, tokens) in references {
        let Some(case) = level.cases.get(&index) else {
            audit.unmatched.push(index);
            continue;
        };
        let (_, verdict) = verify(case.start, tokens, level.side, case.target, &case.oracle)
            .map_err(|source| EvalError::GroundTruth {
                level: level.name.clone(),
                index,
                source,
            })?;
        audit.checked += 1;
        match verdict.failure {
            None => audit.passed += 1,
            Some(failure) => audit.findings.push((index, failure)),
        }
    }
    Ok(audit)
}

/// Audit one level from its `data.json`. `None` if the file is absent.
///
/// # Errors
///
/// Returns an [`EvalError`] if the file exists but cannot be read or
/// parsed, or from [`audit_references`].
pub fn audit_level(level: &LevelData) -> Result<Option<LevelAudit>, EvalError> {
    let path = level.dir.join(REFERENCE_FILENAME);
    if !path.is_file() {
        warn!(level = %level.name, path = %path.display(), "no reference answers, skipping audit");
        return Ok(None);
    }
    let bytes = std::fs::read(&path).map_err(|e| io_error(&path, &e))?;
    let references = parse_references(&path, &bytes)?;
    let audit = audit_references(level, &references)?;
    info!(
        level = %audit.level,
        checked = audit.checked,
        passed = audit.passed,
        unmatched = audit.unmatched.len(),
        "reference audit"
    );
    for (index, failure) in &audit.findings {
        warn!(level = %audit.level, index, %failure, "reference answer fails verification");
    }
    Ok(Some(audit))
}

/// Audit every level that has reference answers.
///
/// # Errors
///
/// Returns the first error from [`audit_level`].
pub fn audit_levels(levels: &[LevelData]) -> Result<Vec<LevelAudit>, EvalError> {
    levels
        .iter()
        .filter_map(|level| audit_level(level).transpose())
        .collect()
}

/// Canonical digest of a set of audits, for cross-run comparison.
///
/// # Errors
///
/// Returns [`ReportError::Canon`] if canonical serialization fails.
pub fn audit_digest(audits: &[LevelAudit]) -> Result<ContentHash, ReportError> {
    let value = json!(audits
        .iter()
        .map(|a| json!({
            "level": a.level,
            "checked": a.checked,
            "passed": a.passed,
            "unmatched": a.unmatched,
            "findings": a
                .findings
                .iter()
                .map(|(index, failure)| json!({"index": index, "failure": failure.label()}))
                .collect::<Vec<_>>(),
        }))
        .collect::<Vec<_>>());
    let bytes = canonical_json_bytes(&value).map_err(ReportError::Canon)?;
    Ok(canonical_hash(DOMAIN_AUDIT_REPORT, &bytes))
}

/// One-line summary of an audit, for stdout.
#[must_use]
pub fn render_audit(audit: &LevelAudit) -> String {
    format!(
        "{:<7}: reference answers {}/{} verified, {} unmatched",
        audit.level,
        audit.passed,
        audit.checked,
        audit.unmatched.len()
    )
}

//! Typed batch errors.
//!
//! Every variant is fatal: it means an input artifact is missing, malformed,
//! or inconsistent with the configured batch layout. Bad predictions are
//! never errors; they are scored as incorrect.

use std::fmt;
use std::path::PathBuf;

use floe_kernel::geometry::grid::GridError;
use floe_kernel::replay::oracle::OracleError;
use floe_kernel::verdict::VerifyError;

/// Fatal failure while loading artifacts or scoring a batch.
#[derive(Debug)]
pub enum EvalError {
    /// Reading a file or directory failed.
    Io { path: PathBuf, detail: String },
    /// A JSON artifact did not parse into the expected shape.
    Parse { path: PathBuf, detail: String },
    /// A level directory name has no trailing side length (e.g. `level4`).
    LevelName { name: String },
    /// A level's side length is invalid.
    Grid { level: String, source: GridError },
    /// A case's distance map has a non-numeric or repeated state key.
    Oracle {
        level: String,
        index: u32,
        source: OracleError,
    },
    /// A case index key in a distance-map file is not numeric.
    CaseKey { path: PathBuf, key: String },
    /// Two case keys in one file name the same index (e.g. `"7"` and `"07"`).
    DuplicateCase { path: PathBuf, index: u32 },
    /// A case in the configured range is missing from the distance-map file.
    MissingCase { level: String, index: u32 },
    /// A case's ground truth is inconsistent (start outside grid or absent
    /// from its own oracle).
    GroundTruth {
        level: String,
        index: u32,
        source: VerifyError,
    },
    /// The prediction list does not have one record per expected case.
    CaseCountMismatch { expected: usize, actual: usize },
    /// A level's prediction block lies outside the prediction list.
    BlockOutOfRange {
        level: String,
        offset: usize,
        len: usize,
        available: usize,
    },
    /// The evaluation config is inconsistent.
    Config { detail: String },
    /// The data directory contains no level directories.
    NoLevels { path: PathBuf },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, detail } => write!(f, "I/O error at {}: {detail}", path.display()),
            Self::Parse { path, detail } => {
                write!(f, "malformed JSON in {}: {detail}", path.display())
            }
            Self::LevelName { name } => {
                write!(f, "level directory {name:?} does not end in a side length")
            }
            Self::Grid { level, source } => write!(f, "{level}: {source}"),
            Self::Oracle {
                level,
                index,
                source,
            } => write!(f, "{level} case {index}: {source}"),
            Self::CaseKey { path, key } => {
                write!(f, "case key {key:?} in {} is not numeric", path.display())
            }
            Self::DuplicateCase { path, index } => {
                write!(f, "case {index} appears more than once in {}", path.display())
            }
            Self::MissingCase { level, index } => {
                write!(f, "{level}: case {index} missing from distance map file")
            }
            Self::GroundTruth {
                level,
                index,
                source,
            } => write!(f, "{level} case {index}: corrupt ground truth: {source}"),
            Self::CaseCountMismatch { expected, actual } => write!(
                f,
                "prediction count mismatch: expected {expected} records, found {actual}"
            ),
            Self::BlockOutOfRange {
                level,
                offset,
                len,
                available,
            } => write!(
                f,
                "{level}: prediction block {offset}..{} exceeds {available} records",
                offset.saturating_add(*len)
            ),
            Self::Config { detail } => write!(f, "invalid evaluation config: {detail}"),
            Self::NoLevels { path } => {
                write!(f, "no level directories found in {}", path.display())
            }
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid { source, .. } => Some(source),
            Self::Oracle { source, .. } => Some(source),
            Self::GroundTruth { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Collect `(index, value)` pairs, rejecting a repeated index.
pub(crate) fn index_unique<T>(
    path: &std::path::Path,
    entries: impl IntoIterator<Item = Result<(u32, T), EvalError>>,
) -> Result<std::collections::BTreeMap<u32, T>, EvalError> {
    let mut out = std::collections::BTreeMap::new();
    for entry in entries {
        let (index, value) = entry?;
        if out.insert(index, value).is_some() {
            return Err(EvalError::DuplicateCase {
                path: path.to_path_buf(),
                index,
            });
        }
    }
    Ok(out)
}

/// Attach a path to an I/O error.
pub(crate) fn io_error(path: &std::path::Path, e: &std::io::Error) -> EvalError {
    EvalError::Io {
        path: path.to_path_buf(),
        detail: e.to_string(),
    }
}

/// Attach a path to a JSON parse error.
pub(crate) fn parse_error(path: &std::path::Path, e: &serde_json::Error) -> EvalError {
    EvalError::Parse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    }
}

//! Ground-truth dataset loading.
//!
//! # Directory layout
//!
//! ```text
//! <data_dir>/
//!   level3/
//!     data_distance_map.json   — case index → {distance_map, start_pos, target_pos}
//!     data.json                — case index → {actions} (reference answers, optional)
//!   level4/
//!   ...
//! ```
//!
//! Level directories are processed in sorted name order. The grid side
//! length is the trailing number of the directory name. Non-directory
//! entries are ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use floe_kernel::geometry::grid::{GridSide, State};
use floe_kernel::replay::oracle::DistanceOracle;

use crate::error::{index_unique, io_error, parse_error, EvalError};

/// Per-level ground-truth file.
pub const DISTANCE_MAP_FILENAME: &str = "data_distance_map.json";

/// One entry of a distance-map file, as stored on disk.
#[derive(Debug, Clone, Deserialize)]
struct CaseRecordV1 {
    distance_map: BTreeMap<String, u32>,
    start_pos: State,
    target_pos: State,
}

/// One grid instance with its reachability oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub index: u32,
    pub start: State,
    pub target: State,
    pub oracle: DistanceOracle,
}

/// All ground truth for one difficulty level. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct LevelData {
    pub name: String,
    pub side: GridSide,
    pub dir: PathBuf,
    pub cases: BTreeMap<u32, TestCase>,
}

impl LevelData {
    /// Look up a case by index.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingCase`] if the index is absent.
    pub fn case(&self, index: u32) -> Result<&TestCase, EvalError> {
        self.cases.get(&index).ok_or_else(|| EvalError::MissingCase {
            level: self.name.clone(),
            index,
        })
    }
}

/// Grid side length encoded in a level name (`"level5"` → 5).
///
/// # Errors
///
/// Returns [`EvalError::LevelName`] if the name has no trailing digits, and
/// [`EvalError::Grid`] if they encode zero.
pub fn level_side(name: &str) -> Result<GridSide, EvalError> {
    let digits_at = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let side: u32 = name[digits_at..]
        .parse()
        .map_err(|_| EvalError::LevelName { name: name.into() })?;
    GridSide::new(side).map_err(|source| EvalError::Grid {
        level: name.into(),
        source,
    })
}

/// Level directories under `data_dir`, sorted by name.
///
/// # Errors
///
/// Returns [`EvalError::Io`] if the directory cannot be listed.
pub fn discover_levels(data_dir: &Path) -> Result<Vec<(String, PathBuf)>, EvalError> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| io_error(data_dir, &e))?;
    let mut levels = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error(data_dir, &e))?;
        let path = entry.path();
        if path.is_dir() {
            levels.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    levels.sort();
    Ok(levels)
}

/// Parse the contents of a distance-map file.
///
/// # Errors
///
/// Returns [`EvalError::Parse`] for malformed JSON, [`EvalError::CaseKey`]
/// for a non-numeric case index, [`EvalError::DuplicateCase`] for two keys
/// naming the same index, and [`EvalError::Oracle`] for a bad state key.
pub fn parse_distance_maps(
    level: &str,
    path: &Path,
    bytes: &[u8],
) -> Result<BTreeMap<u32, TestCase>, EvalError> {
    let raw: BTreeMap<String, CaseRecordV1> =
        serde_json::from_slice(bytes).map_err(|e| parse_error(path, &e))?;

    let entries = raw.into_iter().map(|(key, record)| {
        let index: u32 = key.trim().parse().map_err(|_| EvalError::CaseKey {
            path: path.to_path_buf(),
            key: key.clone(),
        })?;
        let oracle = DistanceOracle::from_string_keys(record.distance_map).map_err(
            |source| EvalError::Oracle {
                level: level.into(),
                index,
                source,
            },
        )?;
        let case = TestCase {
            index,
            start: record.start_pos,
            target: record.target_pos,
            oracle,
        };
        Ok::<_, EvalError>((index, case))
    });
    index_unique(path, entries)
}

/// Load one level directory.
///
/// # Errors
///
/// Returns an [`EvalError`] if the name carries no side length or the
/// distance-map file is missing or malformed.
pub fn load_level(name: &str, dir: &Path) -> Result<LevelData, EvalError> {
    let side = level_side(name)?;
    let path = dir.join(DISTANCE_MAP_FILENAME);
    let bytes = std::fs::read(&path).map_err(|e| io_error(&path, &e))?;
    let cases = parse_distance_maps(name, &path, &bytes)?;
    Ok(LevelData {
        name: name.into(),
        side,
        dir: dir.to_path_buf(),
        cases,
    })
}

/// Load every level under `data_dir`, in sorted order.
///
/// # Errors
///
/// Returns [`EvalError::NoLevels`] if there are no level directories, or the
/// first error from [`load_level`].
pub fn load_levels(data_dir: &Path) -> Result<Vec<LevelData>, EvalError> {
    let levels = discover_levels(data_dir)?
        .into_iter()
        .map(|(name, dir)| load_level(&name, &dir))
        .collect::<Result<Vec<_>, _>>()?;
    if levels.is_empty() {
        return Err(EvalError::NoLevels {
            path: data_dir.to_path_buf(),
        });
    }
    Ok(levels)
}

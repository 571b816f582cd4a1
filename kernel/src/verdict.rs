//! The correctness predicate for one test case.
//!
//! A prediction is correct iff all three hold:
//!
//! - (a) every replayed step is valid,
//! - (b) the path length equals the oracle's shortest distance from start,
//! - (c) the final coordinate is the target.
//!
//! Length alone says nothing: an invalid step freezes the walker but still
//! consumes a path slot. No check is made that the path is simple.

use std::fmt;

use crate::geometry::grid::{to_coordinate, to_state, Coord, GridError, GridSide, State};
use crate::replay::oracle::DistanceOracle;
use crate::replay::walk::{replay, ReplayedPath};

/// First conjunct of the predicate that a prediction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFailure {
    /// Step `index` was not a legal move.
    InvalidStep { index: usize },
    /// All steps legal, but the path is not of shortest length.
    WrongLength { expected: u32, actual: usize },
    /// All steps legal and of shortest length, but the walk ends elsewhere.
    WrongEndpoint { expected: State, actual: i64 },
}

impl CaseFailure {
    /// Stable snake-case label for reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InvalidStep { .. } => "invalid_step",
            Self::WrongLength { .. } => "wrong_length",
            Self::WrongEndpoint { .. } => "wrong_endpoint",
        }
    }
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStep { index } => write!(f, "step {index} is not a legal move"),
            Self::WrongLength { expected, actual } => {
                write!(f, "path length {actual} != shortest distance {expected}")
            }
            Self::WrongEndpoint { expected, actual } => {
                write!(f, "path ends at state {actual}, target is {expected}")
            }
        }
    }
}

/// Outcome of judging one replayed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseVerdict {
    pub path_len: usize,
    pub true_distance: u32,
    /// State of the final coordinate (the start state for an empty path).
    pub final_state: i64,
    /// `None` when the prediction is correct.
    pub failure: Option<CaseFailure>,
}

impl CaseVerdict {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.failure.is_none()
    }
}

/// Apply the correctness predicate to an already-replayed path.
#[must_use]
pub fn judge(
    start: Coord,
    path: &ReplayedPath,
    side: GridSide,
    target: State,
    true_distance: u32,
) -> CaseVerdict {
    let final_state = to_state(path.final_coord(start), side);
    let length_matches = u32::try_from(path.len()).is_ok_and(|len| len == true_distance);

    let failure = if let Some(index) = path.first_invalid() {
        Some(CaseFailure::InvalidStep { index })
    } else if !length_matches {
        Some(CaseFailure::WrongLength {
            expected: true_distance,
            actual: path.len(),
        })
    } else if final_state != i64::from(target) {
        Some(CaseFailure::WrongEndpoint {
            expected: target,
            actual: final_state,
        })
    } else {
        None
    };

    CaseVerdict {
        path_len: path.len(),
        true_distance,
        final_state,
        failure,
    }
}

/// Typed failure for [`verify`]: the ground truth itself is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The start state is outside the grid.
    Grid(GridError),
    /// The start state has no oracle distance.
    StartNotInOracle { start: State },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "{e}"),
            Self::StartNotInOracle { start } => {
                write!(f, "start state {start} is not a key of the distance map")
            }
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::StartNotInOracle { .. } => None,
        }
    }
}

impl From<GridError> for VerifyError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

/// Replay and judge one `(start, actions, side, target, oracle)` tuple.
///
/// # Errors
///
/// Returns [`VerifyError`] if `start` is outside the grid or has no oracle
/// distance. Bad predictions are never errors; they produce a failing
/// verdict.
pub fn verify<S: AsRef<str>>(
    start: State,
    actions: &[S],
    side: GridSide,
    target: State,
    oracle: &DistanceOracle,
) -> Result<(ReplayedPath, CaseVerdict), VerifyError> {
    let start_coord = to_coordinate(start, side)?;
    let true_distance = oracle
        .distance(start)
        .ok_or(VerifyError::StartNotInOracle { start })?;
    let path = replay(start_coord, actions, side, target, oracle);
    let verdict = judge(start_coord, &path, side, target, true_distance);
    Ok((path, verdict))
}

//! Square grid addressing: linear state index ↔ `(row, col)` coordinate.
//!
//! # Layout
//!
//! A grid of side `n` has `n * n` cells addressed row-major:
//!
//! ```text
//! state = row * n + col        0 <= row, col < n
//! row   = state / n
//! col   = state % n
//! ```
//!
//! Coordinates are signed so that a step off the edge (row `-1`, col `n`)
//! can be represented and recorded for diagnostics. Only [`to_coordinate`]
//! validates its input; [`to_state`] is total and leaves bounds checks to
//! the caller ([`GridSide::contains`]).

use std::fmt;

/// A linear, row-major cell index.
pub type State = u32;

/// Side length of a square grid. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridSide(u32);

/// Typed failure for grid addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A grid must have at least one cell.
    ZeroSide,
    /// `state >= side * side`.
    StateOutOfRange { state: State, side: u32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSide => write!(f, "grid side length must be at least 1"),
            Self::StateOutOfRange { state, side } => write!(
                f,
                "state {state} out of range for {side}x{side} grid (must be < {})",
                u64::from(*side) * u64::from(*side)
            ),
        }
    }
}

impl std::error::Error for GridError {}

impl GridSide {
    /// Construct a side length.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZeroSide`] if `side == 0`.
    pub const fn new(side: u32) -> Result<Self, GridError> {
        if side == 0 {
            return Err(GridError::ZeroSide);
        }
        Ok(Self(side))
    }

    /// The raw side length.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Total number of cells (`side²`).
    #[must_use]
    pub const fn cell_count(self) -> u64 {
        self.0 as u64 * self.0 as u64
    }

    /// True if both components of `coord` lie in `[0, side)`.
    #[must_use]
    pub fn contains(self, coord: Coord) -> bool {
        let n = i64::from(self.0);
        (0..n).contains(&coord.row) && (0..n).contains(&coord.col)
    }
}

impl fmt::Display for GridSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// A `(row, col)` grid coordinate. May lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: i64,
    pub col: i64,
}

impl Coord {
    #[must_use]
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// This coordinate shifted by a `(d_row, d_col)` delta.
    #[must_use]
    pub const fn offset(self, (d_row, d_col): (i64, i64)) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Convert a state index into its coordinate.
///
/// # Errors
///
/// Returns [`GridError::StateOutOfRange`] if `state >= side²`. Callers in the
/// batch path treat this as fatal: it means the ground truth is corrupt.
pub fn to_coordinate(state: State, side: GridSide) -> Result<Coord, GridError> {
    if u64::from(state) >= side.cell_count() {
        return Err(GridError::StateOutOfRange {
            state,
            side: side.get(),
        });
    }
    let n = side.get();
    Ok(Coord::new(i64::from(state / n), i64::from(state % n)))
}

/// Convert a coordinate into its state index. Does not validate.
///
/// For coordinates outside the grid the result is meaningless (and may be
/// negative); bounds-check with [`GridSide::contains`] first.
#[must_use]
pub fn to_state(coord: Coord, side: GridSide) -> i64 {
    coord.row * i64::from(side.get()) + coord.col
}

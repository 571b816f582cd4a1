//! `replay()`: walk a move-token sequence across the grid.
//!
//! # Step rules
//!
//! For each token, in order:
//!
//! 1. Unrecognized token → `{current, invalid}`; position unchanged.
//! 2. `next = current + delta`.
//! 3. `next` off the grid → `{next, invalid}`; position unchanged.
//! 4. `next` not a legal destination → `{next, invalid}`; position unchanged.
//! 5. Otherwise → `{next, valid}`; position advances to `next`.
//!
//! The output has exactly one step per token. An invalid step never stops
//! the walk: the next delta is applied to the last valid position.

use crate::geometry::grid::{to_state, Coord, GridSide, State};
use crate::geometry::moves::Move;
use crate::replay::oracle::DistanceOracle;

/// One replayed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    /// The attempted coordinate (for unrecognized tokens, the unchanged
    /// position).
    pub coord: Coord,
    /// Whether the step was a legal move.
    pub valid: bool,
}

/// The ordered result of replaying a token sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayedPath {
    steps: Vec<PathStep>,
}

impl ReplayedPath {
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of steps (always the number of input tokens).
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True if every step is valid (vacuously true for an empty path).
    #[must_use]
    pub fn all_valid(&self) -> bool {
        self.steps.iter().all(|s| s.valid)
    }

    /// Index of the first invalid step, if any.
    #[must_use]
    pub fn first_invalid(&self) -> Option<usize> {
        self.steps.iter().position(|s| !s.valid)
    }

    /// Coordinate recorded by the last step, or `start` for an empty path.
    #[must_use]
    pub fn final_coord(&self, start: Coord) -> Coord {
        self.steps.last().map_or(start, |s| s.coord)
    }
}

/// Replay `actions` from `start` on a `side`×`side` grid.
///
/// Pure: the same inputs always produce the same path. Never fails; every
/// kind of bad move is reported as an invalid step.
pub fn replay<S: AsRef<str>>(
    start: Coord,
    actions: &[S],
    side: GridSide,
    target: State,
    oracle: &DistanceOracle,
) -> ReplayedPath {
    let mut current = start;
    let steps = actions
        .iter()
        .map(|token| {
            let Some(mv) = Move::parse(token.as_ref()) else {
                return PathStep {
                    coord: current,
                    valid: false,
                };
            };
            let next = current.offset(mv.delta());
            let valid = side.contains(next)
                && State::try_from(to_state(next, side))
                    .is_ok_and(|state| oracle.is_legal_destination(state, target));
            if valid {
                current = next;
            }
            PathStep { coord: next, valid }
        })
        .collect();
    ReplayedPath { steps }
}

//! `DistanceOracle`: precomputed shortest distances to the target.
//!
//! A state is a key iff it is a non-obstacle cell from which the target is
//! reachable; the value is the number of moves on a shortest path. Absence
//! means "obstacle or unreachable".
//!
//! # Target asymmetry
//!
//! The target itself is the sink of the distance computation and may be
//! absent from the map. Landing on it is still legal. This rule lives in
//! exactly one place, [`DistanceOracle::is_legal_destination`].

use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::grid::State;

/// Typed failure for oracle construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// A distance-map key is not a decimal state index.
    NonNumericKey { key: String },
    /// Two keys name the same state (e.g. `"3"` and `"03"`).
    DuplicateState { state: State },
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonNumericKey { key } => {
                write!(f, "distance map key is not a state index: {key:?}")
            }
            Self::DuplicateState { state } => {
                write!(f, "distance map names state {state} more than once")
            }
        }
    }
}

impl std::error::Error for OracleError {}

/// Shortest distance from each reachable state to the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistanceOracle {
    distances: BTreeMap<State, u32>,
}

impl DistanceOracle {
    #[must_use]
    pub fn new(distances: BTreeMap<State, u32>) -> Self {
        Self { distances }
    }

    /// Build from string-keyed entries, as stored in distance-map files.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::NonNumericKey`] for the first key that does not
    /// parse as a state index, and [`OracleError::DuplicateState`] if two keys
    /// parse to the same state.
    pub fn from_string_keys<K, I>(entries: I) -> Result<Self, OracleError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, u32)>,
    {
        let mut distances = BTreeMap::new();
        for (key, distance) in entries {
            let key = key.as_ref();
            let state = key
                .trim()
                .parse::<State>()
                .map_err(|_| OracleError::NonNumericKey { key: key.into() })?;
            if distances.insert(state, distance).is_some() {
                return Err(OracleError::DuplicateState { state });
            }
        }
        Ok(Self::new(distances))
    }

    /// Shortest distance from `state`, if it is a reachable source.
    #[must_use]
    pub fn distance(&self, state: State) -> Option<u32> {
        self.distances.get(&state).copied()
    }

    #[must_use]
    pub fn contains(&self, state: State) -> bool {
        self.distances.contains_key(&state)
    }

    /// True if a walker may step onto `state`: it is a key of the oracle, or
    /// it is the target (which is legal even when absent).
    #[must_use]
    pub fn is_legal_destination(&self, state: State, target: State) -> bool {
        state == target || self.contains(state)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

impl FromIterator<(State, u32)> for DistanceOracle {
    fn from_iter<T: IntoIterator<Item = (State, u32)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

//! Grid geometry: coordinates, states, and move tokens.

pub mod grid;
pub mod moves;

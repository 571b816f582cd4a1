//! Floe Kernel: the pure core of the Frozen Lake action-sequence verifier.
//!
//! # API Surface
//!
//! - [`geometry::grid::to_coordinate`] / [`geometry::grid::to_state`] -- map
//!   between a row-major state index and a `(row, col)` coordinate
//! - [`replay::walk::replay`] -- replay move tokens against a reachability oracle
//! - [`verdict::judge`] / [`verdict::verify`] -- apply the correctness predicate
//! - [`answer::extract_actions`] -- pull move tokens out of free-form model output
//!
//! # Module Dependency Direction
//!
//! `geometry` ← `replay` ← `verdict`
//!
//! `answer` is standalone. Nothing in this crate performs I/O or holds
//! shared mutable state, so every entry point may be called concurrently
//! across independent test cases.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod answer;
pub mod geometry;
pub mod replay;
pub mod verdict;

//! Floe Harness: batch evaluation of model predictions against ground truth.
//!
//! The harness loads the file-backed artifacts (per-level distance maps and
//! a flat prediction-results list), drives the kernel verifier over every
//! case, and folds the verdicts into per-level and overall accuracy.
//!
//! The harness does NOT implement verification logic; it delegates to
//! `floe_kernel`. It owns file formats, batch layout, aggregation, and
//! reporting.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod audit;
pub mod canon;
pub mod config;
pub mod dataset;
pub mod error;
pub mod predictions;
pub mod report;
pub mod runner;
pub mod scoring;

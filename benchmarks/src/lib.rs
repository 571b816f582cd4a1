//! Shared helpers for floe benchmark suites.
//!
//! Everything is built in memory so the timed sections measure replay and
//! scoring, not file I/O.

use std::collections::BTreeMap;
use std::path::PathBuf;

use floe_harness::config::{BatchLayout, EvalConfig};
use floe_harness::dataset::{level_side, LevelData, TestCase};
use floe_harness::predictions::PredictionRecord;
use floe_kernel::replay::oracle::DistanceOracle;

/// Oracle for an obstacle-free grid: Manhattan distance to `target`.
#[must_use]
pub fn open_oracle(side: u32, target: u32) -> DistanceOracle {
    let (tr, tc) = (target / side, target % side);
    (0..side * side)
        .map(|s| (s, (s / side).abs_diff(tr) + (s % side).abs_diff(tc)))
        .collect()
}

/// Optimal answer from the top-left corner to the bottom-right corner.
#[must_use]
pub fn corner_to_corner_tokens(side: u32) -> Vec<&'static str> {
    let n = (side - 1) as usize;
    let mut tokens = vec!["right"; n];
    tokens.extend(std::iter::repeat("down").take(n));
    tokens
}

/// A level named `level<side>` with one corner-to-corner case per index in
/// `cases`.
///
/// # Panics
///
/// Panics if `side` is zero.
#[must_use]
pub fn synthetic_level(side: u32, cases: std::ops::Range<u32>) -> LevelData {
    let name = format!("level{side}");
    let target = side * side - 1;
    let oracle = open_oracle(side, target);
    let cases: BTreeMap<u32, TestCase> = cases
        .map(|index| {
            let case = TestCase {
                index,
                start: 0,
                target,
                oracle: oracle.clone(),
            };
            (index, case)
        })
        .collect();
    LevelData {
        side: level_side(&name).expect("nonzero side"),
        name,
        dir: PathBuf::new(),
        cases,
    }
}

/// A full batch: levels `3..3+level_count`, default layout, and one
/// prediction block per level in which every other answer is optimal.
///
/// # Panics
///
/// Panics if the default layout fails to resolve.
#[must_use]
pub fn synthetic_batch(level_count: u32) -> (Vec<LevelData>, Vec<PredictionRecord>, BatchLayout) {
    let layout = EvalConfig::default().resolve().expect("default layout");
    let levels: Vec<LevelData> = (3..3 + level_count)
        .map(|side| synthetic_level(side, layout.cases.clone()))
        .collect();
    let mut predictions = Vec::with_capacity(
        layout
            .expected_records(levels.len())
            .expect("record count fits"),
    );
    for level in &levels {
        let optimal = corner_to_corner_tokens(level.side.get()).join(" ");
        for i in 0..layout.block_size {
            let body = if i % 2 == 0 { optimal.as_str() } else { "up left" };
            predictions.push(PredictionRecord {
                image: String::new(),
                prompt: String::new(),
                model_output: format!("<ANSWER>{body}</ANSWER>"),
            });
        }
    }
    (levels, predictions, layout)
}

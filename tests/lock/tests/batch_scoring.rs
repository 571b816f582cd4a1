//! End-to-end batch scoring through on-disk artifacts.
//!
//! Each test lays out a dataset and a results file in a temp dir and runs
//! the full pipeline: config → load levels → load predictions → evaluate.

use std::path::Path;

use floe_harness::config::EvalConfig;
use floe_harness::report::build_report;
use floe_harness::runner::{run, BatchRun};
use floe_harness::scoring::render_summary;
use floe_kernel::verdict::CaseFailure;
use lock_tests::dataset_builder::{
    answer, two_level_fixture, write_level, write_results, FixtureCase,
};

fn config(start: u32, end: u32, block: usize) -> EvalConfig {
    EvalConfig {
        range_start: Some(start),
        range_end: Some(end),
        block_size: Some(block),
        level_offsets: None,
    }
}

/// One `level2` case (start 0, target 3) scored against one model output.
fn score_single(root: &Path, case: FixtureCase, output: String) -> BatchRun {
    let data_dir = root.join("data");
    write_level(&data_dir, "level2", &[case]);
    let results = root.join("results.json");
    write_results(&results, &[output]);
    run(&data_dir, &results, &config(0, 1, 1)).unwrap()
}

fn failure_of(batch: &BatchRun) -> Option<CaseFailure> {
    batch.evaluation.levels[0].outcomes[0].verdict.failure
}

// ---------------------------------------------------------------------------
// Single-case scenarios
// ---------------------------------------------------------------------------

#[test]
fn optimal_path_is_correct() {
    let dir = tempfile::tempdir().unwrap();
    let batch = score_single(
        dir.path(),
        FixtureCase::open_grid(0, 2, 0, 3),
        answer(&["right", "down"]),
    );
    assert_eq!(failure_of(&batch), None);
    assert_eq!(batch.evaluation.totals.correct, 1);
}

#[test]
fn legal_detour_is_wrong_length() {
    let dir = tempfile::tempdir().unwrap();
    let batch = score_single(
        dir.path(),
        FixtureCase::open_grid(0, 2, 0, 3),
        answer(&["right", "down", "up", "down"]),
    );
    let outcome = &batch.evaluation.levels[0].outcomes[0];
    assert_eq!(outcome.verdict.path_len, 4);
    assert_eq!(
        outcome.verdict.failure,
        Some(CaseFailure::WrongLength {
            expected: 2,
            actual: 4
        })
    );
}

#[test]
fn target_absent_from_oracle_is_still_reachable() {
    let dir = tempfile::tempdir().unwrap();
    let case = FixtureCase {
        index: 0,
        start: 0,
        target: 3,
        distances: vec![(0, 2), (2, 1)],
    };
    let batch = score_single(dir.path(), case, answer(&["down", "right"]));
    assert_eq!(failure_of(&batch), None);
}

#[test]
fn unknown_token_is_invalid_step() {
    let dir = tempfile::tempdir().unwrap();
    let batch = score_single(
        dir.path(),
        FixtureCase::open_grid(0, 2, 0, 3),
        answer(&["jump"]),
    );
    assert_eq!(
        failure_of(&batch),
        Some(CaseFailure::InvalidStep { index: 0 })
    );
}

#[test]
fn mixed_case_tokens_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let batch = score_single(
        dir.path(),
        FixtureCase::open_grid(0, 2, 0, 3),
        "<ANSWER>  Right\tDOWN </ANSWER>".to_string(),
    );
    assert_eq!(failure_of(&batch), None);
}

#[test]
fn missing_markers_score_as_empty_path() {
    let dir = tempfile::tempdir().unwrap();
    let batch = score_single(
        dir.path(),
        FixtureCase::open_grid(0, 2, 0, 3),
        "right down".to_string(),
    );
    let outcome = &batch.evaluation.levels[0].outcomes[0];
    assert!(outcome.actions.is_empty());
    assert_eq!(outcome.verdict.final_state, 0);
    assert_eq!(
        outcome.verdict.failure,
        Some(CaseFailure::WrongLength {
            expected: 2,
            actual: 0
        })
    );
}

#[test]
fn step_into_obstacle_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    // State 1 is an obstacle: absent from the oracle and not the target.
    let case = FixtureCase {
        index: 0,
        start: 0,
        target: 3,
        distances: vec![(0, 2), (2, 1), (3, 0)],
    };
    let batch = score_single(dir.path(), case, answer(&["right", "down"]));
    assert_eq!(
        failure_of(&batch),
        Some(CaseFailure::InvalidStep { index: 0 })
    );
}

#[test]
fn off_grid_step_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let batch = score_single(
        dir.path(),
        FixtureCase::open_grid(0, 2, 0, 3),
        answer(&["up", "down"]),
    );
    assert_eq!(
        failure_of(&batch),
        Some(CaseFailure::InvalidStep { index: 0 })
    );
}

#[test]
fn right_length_wrong_endpoint_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    write_level(&data_dir, "level3", &[FixtureCase::open_grid(0, 3, 0, 8)]);
    let results = dir.path().join("results.json");
    write_results(&results, &[answer(&["right", "left", "right", "right"])]);
    let batch = run(&data_dir, &results, &config(0, 1, 1)).unwrap();
    assert_eq!(
        batch.evaluation.levels[0].outcomes[0].verdict.failure,
        Some(CaseFailure::WrongEndpoint {
            expected: 8,
            actual: 2
        })
    );
}

// ---------------------------------------------------------------------------
// Multi-level batches
// ---------------------------------------------------------------------------

#[test]
fn two_level_fixture_scores_per_level() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = two_level_fixture(dir.path());
    let batch = run(&fixture.data_dir, &fixture.results, &config(0, 2, 2)).unwrap();

    let totals = &batch.evaluation.totals;
    assert_eq!((totals.correct, totals.total), (2, 4));
    let per_level: Vec<(&str, u64, u64)> = totals
        .levels
        .iter()
        .map(|t| (t.level.as_str(), t.correct, t.total))
        .collect();
    assert_eq!(per_level, vec![("level2", 2, 2), ("level3", 0, 2)]);
    assert!((totals.mean_level_accuracy() - 0.5).abs() < 1e-12);

    let summary = render_summary(totals);
    assert!(summary.contains("level2 : 100.0000 (2/2)"), "{summary}");
    assert!(summary.contains("level3 : 0.0000 (0/2)"), "{summary}");
    assert!(summary.contains("Average: 50.0000"), "{summary}");
}

#[test]
fn offsets_select_each_level_block() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    write_level(
        &data_dir,
        "level2",
        &[FixtureCase::open_grid(0, 2, 0, 3)],
    );
    write_level(
        &data_dir,
        "level3",
        &[
            FixtureCase::open_grid(0, 3, 0, 8),
            FixtureCase::open_grid(1, 3, 4, 8),
            FixtureCase::open_grid(2, 3, 7, 8),
        ],
    );
    let results = dir.path().join("results.json");
    // Block size 3, range 0..1: level2 reads record 0, level3 reads record 3.
    write_results(
        &results,
        &[
            answer(&["right", "down"]),
            String::new(),
            String::new(),
            answer(&["jump"]),
            String::new(),
            String::new(),
        ],
    );
    let batch = run(&data_dir, &results, &config(0, 1, 3)).unwrap();
    let totals = &batch.evaluation.totals;
    assert_eq!((totals.correct, totals.total), (1, 2));
    assert!((totals.mean_level_accuracy() - 0.5).abs() < 1e-12);

    // Per-level overrides pick different records for level3.
    let mut cfg = config(0, 1, 3);
    cfg.level_offsets = Some([("level3".to_string(), 4)].into_iter().collect());
    write_results(
        &results,
        &[
            answer(&["right", "down"]),
            String::new(),
            String::new(),
            answer(&["jump"]),
            answer(&["right", "right", "down", "down"]),
            String::new(),
        ],
    );
    let batch = run(&data_dir, &results, &cfg).unwrap();
    assert_eq!(batch.evaluation.totals.correct, 2);
}

#[test]
fn levels_are_processed_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    write_level(&data_dir, "level4", &[FixtureCase::open_grid(0, 4, 0, 15)]);
    write_level(&data_dir, "level3", &[FixtureCase::open_grid(0, 3, 0, 8)]);
    let results = dir.path().join("results.json");
    write_results(
        &results,
        &[
            answer(&["right", "right", "down", "down"]),
            answer(&["right", "right", "right", "down", "down", "down"]),
        ],
    );
    let batch = run(&data_dir, &results, &config(0, 1, 1)).unwrap();
    let names: Vec<&str> = batch
        .evaluation
        .levels
        .iter()
        .map(|s| s.tally.level.as_str())
        .collect();
    assert_eq!(names, vec!["level3", "level4"]);
    assert_eq!(batch.evaluation.totals.correct, 2);
}

#[test]
fn report_from_fixture_is_stable_within_process() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let fa = two_level_fixture(a.path());
    let fb = two_level_fixture(b.path());
    let ra = run(&fa.data_dir, &fa.results, &config(0, 2, 2)).unwrap();
    let rb = run(&fb.data_dir, &fb.results, &config(0, 2, 2)).unwrap();
    let da = build_report("eval_results_fixture.json", &ra.evaluation).unwrap();
    let db = build_report("eval_results_fixture.json", &rb.evaluation).unwrap();
    assert_eq!(da.bytes, db.bytes);
    assert_eq!(da.digest, db.digest);
}

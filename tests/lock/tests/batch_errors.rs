//! Fatal error paths of a batch run. Every one aborts with a typed error;
//! none yields a partial result.

use floe_harness::config::EvalConfig;
use floe_harness::dataset::DISTANCE_MAP_FILENAME;
use floe_harness::error::EvalError;
use floe_harness::runner::run;
use floe_kernel::verdict::VerifyError;
use lock_tests::dataset_builder::{answer, write_level, write_results, FixtureCase};

fn config(start: u32, end: u32, block: usize) -> EvalConfig {
    EvalConfig {
        range_start: Some(start),
        range_end: Some(end),
        block_size: Some(block),
        level_offsets: None,
    }
}

#[test]
fn record_count_must_match_layout() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    write_level(&data_dir, "level2", &[FixtureCase::open_grid(0, 2, 0, 3)]);
    let results = dir.path().join("results.json");
    write_results(&results, &[answer(&["right", "down"]), String::new()]);

    let err = run(&data_dir, &results, &config(0, 1, 1)).unwrap_err();
    assert!(
        matches!(
            err,
            EvalError::CaseCountMismatch {
                expected: 1,
                actual: 2
            }
        ),
        "{err:?}"
    );
}

#[test]
fn start_missing_from_oracle_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let case = FixtureCase {
        index: 0,
        start: 0,
        target: 3,
        distances: vec![(1, 1), (2, 1)],
    };
    write_level(&data_dir, "level2", &[case]);
    let results = dir.path().join("results.json");
    write_results(&results, &[answer(&["right", "down"])]);

    let err = run(&data_dir, &results, &config(0, 1, 1)).unwrap_err();
    match err {
        EvalError::GroundTruth {
            level,
            index,
            source,
        } => {
            assert_eq!(level, "level2");
            assert_eq!(index, 0);
            assert_eq!(source, VerifyError::StartNotInOracle { start: 0 });
        }
        other => panic!("expected GroundTruth, got {other:?}"),
    }
}

#[test]
fn start_outside_grid_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let case = FixtureCase {
        index: 0,
        start: 4,
        target: 3,
        distances: vec![(4, 1), (3, 0)],
    };
    write_level(&data_dir, "level2", &[case]);
    let results = dir.path().join("results.json");
    write_results(&results, &[answer(&["down"])]);

    let err = run(&data_dir, &results, &config(0, 1, 1)).unwrap_err();
    assert!(
        matches!(
            err,
            EvalError::GroundTruth {
                source: VerifyError::Grid(_),
                ..
            }
        ),
        "{err:?}"
    );
}

#[test]
fn case_outside_dataset_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    write_level(&data_dir, "level2", &[FixtureCase::open_grid(0, 2, 0, 3)]);
    let results = dir.path().join("results.json");
    write_results(&results, &[String::new(), String::new()]);

    let err = run(&data_dir, &results, &config(0, 2, 2)).unwrap_err();
    assert!(
        matches!(err, EvalError::MissingCase { index: 1, .. }),
        "{err:?}"
    );
}

#[test]
fn non_numeric_oracle_key_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let level_dir = dir.path().join("data").join("level2");
    std::fs::create_dir_all(&level_dir).unwrap();
    std::fs::write(
        level_dir.join(DISTANCE_MAP_FILENAME),
        br#"{"0": {"distance_map": {"zero": 2}, "start_pos": 0, "target_pos": 3}}"#,
    )
    .unwrap();
    let results = dir.path().join("results.json");
    write_results(&results, &[String::new()]);

    let err = run(&dir.path().join("data"), &results, &config(0, 1, 1)).unwrap_err();
    assert!(matches!(err, EvalError::Oracle { .. }), "{err:?}");
}

#[test]
fn malformed_results_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    write_level(&data_dir, "level2", &[FixtureCase::open_grid(0, 2, 0, 3)]);
    let results = dir.path().join("results.json");
    std::fs::write(&results, b"{\"not\": \"a list\"}").unwrap();

    let err = run(&data_dir, &results, &config(0, 1, 1)).unwrap_err();
    assert!(matches!(err, EvalError::Parse { .. }), "{err:?}");
}

#[test]
fn missing_results_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    write_level(&data_dir, "level2", &[FixtureCase::open_grid(0, 2, 0, 3)]);

    let err = run(&data_dir, &dir.path().join("absent.json"), &config(0, 1, 1)).unwrap_err();
    assert!(matches!(err, EvalError::Io { .. }), "{err:?}");
}

#[test]
fn empty_data_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    let results = dir.path().join("results.json");
    write_results(&results, &[]);

    let err = run(&data_dir, &results, &config(0, 1, 1)).unwrap_err();
    assert!(matches!(err, EvalError::NoLevels { .. }), "{err:?}");
}

#[test]
fn level_name_without_side_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    write_level(&data_dir, "levelX", &[FixtureCase::open_grid(0, 2, 0, 3)]);
    let results = dir.path().join("results.json");
    write_results(&results, &[String::new()]);

    let err = run(&data_dir, &results, &config(0, 1, 1)).unwrap_err();
    assert!(matches!(err, EvalError::LevelName { .. }), "{err:?}");
}

//! Cross-process determinism of the evaluation report.
//!
//! Runs the `report_fixture` binary once per environment variant and
//! requires byte-identical stdout. The fixture builds its dataset in a fresh
//! temp dir each time, so this also pins that report and audit digests do
//! not depend on where the data lives.

use std::process::Command;

/// Working directory and extra environment for one run.
struct Variant {
    label: &'static str,
    cwd: &'static str,
    env: &'static [(&'static str, &'static str)],
}

const VARIANTS: &[Variant] = &[
    Variant {
        label: "crate dir",
        cwd: env!("CARGO_MANIFEST_DIR"),
        env: &[],
    },
    Variant {
        label: "root cwd",
        cwd: "/",
        env: &[],
    },
    Variant {
        label: "C locale",
        cwd: env!("CARGO_MANIFEST_DIR"),
        env: &[("LC_ALL", "C"), ("LANG", "C")],
    },
    Variant {
        label: "unrelated env",
        cwd: env!("CARGO_MANIFEST_DIR"),
        env: &[("FLOE_NOISE", "1"), ("TZ", "Pacific/Auckland"), ("RUST_LOG", "debug")],
    },
];

fn fixture_stdout(variant: &Variant) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_report_fixture"))
        .current_dir(variant.cwd)
        .env_remove("LC_ALL")
        .env_remove("LANG")
        .env_remove("RUST_LOG")
        .envs(variant.env.iter().copied())
        .output()
        .unwrap_or_else(|e| panic!("{}: failed to spawn report_fixture: {e}", variant.label));
    assert!(
        output.status.success(),
        "{}: report_fixture exited with {}: stderr={}",
        variant.label,
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn report_digest_is_identical_across_processes() {
    let baseline = fixture_stdout(&VARIANTS[0]);
    for line in [
        "correct=2",
        "total=4",
        "mean_accuracy_ppm=500000",
    ] {
        assert!(baseline.lines().any(|l| l == line), "missing {line}: {baseline}");
    }
    assert!(baseline.contains("report_digest=sha256:"), "{baseline}");
    assert!(baseline.contains("audit_digest=sha256:"), "{baseline}");

    for variant in &VARIANTS[1..] {
        assert_eq!(
            baseline,
            fixture_stdout(variant),
            "output differs for variant {}",
            variant.label
        );
    }
}

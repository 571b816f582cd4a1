//! `floe-eval`: score a prediction-results file against the grid dataset.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use floe_harness::audit::{audit_digest, audit_levels, render_audit};
use floe_harness::config::{
    EvalConfig, DEFAULT_BLOCK_SIZE, DEFAULT_RANGE_END, DEFAULT_RANGE_START,
};
use floe_harness::predictions::{resolve_results_path, DEFAULT_PREFIX};
use floe_harness::report::{build_report, write_report};
use floe_harness::runner::run;
use floe_harness::scoring::render_summary;

#[derive(Parser, Debug)]
#[command(name = "floe-eval")]
#[command(about = "Score shortest-path predictions on FrozenLake grids")]
struct Args {
    /// Results file name under the prefix directory (`.json` optional).
    #[arg()]
    name: String,

    /// Directory holding results files.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: PathBuf,

    /// Ground-truth root with one `levelN` directory per grid size.
    /// Defaults to `<prefix>/optimal_with_distance`.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_RANGE_START)]
    range_start: u32,

    /// Exclusive.
    #[arg(long, default_value_t = DEFAULT_RANGE_END)]
    range_end: u32,

    /// Prediction records per level.
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Write the canonical JSON report to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Also replay each level's reference answers (`data.json`).
    #[arg(long, default_value_t = false)]
    audit: bool,

    /// Raise log verbosity (`-v` info, `-vv` debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let results_path = resolve_results_path(&args.prefix, &args.name);
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| args.prefix.join("optimal_with_distance"));
    let config = EvalConfig {
        range_start: Some(args.range_start),
        range_end: Some(args.range_end),
        block_size: Some(args.block_size),
        level_offsets: None,
    };

    let batch = run(&data_dir, &results_path, &config).with_context(|| {
        format!(
            "Failed to evaluate {} against {}.",
            results_path.display(),
            data_dir.display()
        )
    })?;
    print!("{}", render_summary(&batch.evaluation.totals));

    if let Some(report_path) = &args.report {
        let results_file = results_path
            .file_name()
            .map_or_else(|| args.name.clone(), |n| n.to_string_lossy().into_owned());
        let report = build_report(&results_file, &batch.evaluation)
            .context("Failed to build evaluation report.")?;
        write_report(&report, report_path)
            .with_context(|| format!("Failed to write report to {}.", report_path.display()))?;
        info!(path = %report_path.display(), digest = %report.digest, "report written");
        println!("Report : {} ({})", report_path.display(), report.digest);
    }

    if args.audit {
        let audits = audit_levels(&batch.levels).context("Reference audit failed.")?;
        println!("\n==== Reference Audit ====");
        for audit in &audits {
            println!("{}", render_audit(audit));
        }
        let digest = audit_digest(&audits).context("Failed to digest audit results.")?;
        println!("Audit  : {digest}");
    }

    Ok(())
}

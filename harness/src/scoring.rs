//! Batch scoring: fold per-case verdicts into per-level and global tallies.
//!
//! # Pipeline
//!
//! ```text
//! for level in sorted(levels):
//!   block = predictions[offset .. offset + case_count]
//!   for index in cases (ascending):
//!     extract_actions(record) → verify(start, actions, side, target, oracle)
//!     → LevelTally::record(verdict)
//!   Accumulator::with_level(tally)
//! ```
//!
//! The accumulator is a plain value threaded through a fold. The headline
//! metric is the unweighted mean of per-level accuracies, not the global
//! correct/total ratio.

use std::fmt::Write as _;

use tracing::{debug, info};

use floe_kernel::verdict::{verify, CaseVerdict};

use crate::config::BatchLayout;
use crate::dataset::LevelData;
use crate::error::EvalError;
use crate::predictions::PredictionRecord;

/// Verdict for one case, with the actions that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub index: u32,
    pub actions: Vec<String>,
    pub verdict: CaseVerdict,
}

/// Correct/total counters for one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTally {
    pub level: String,
    pub side: u32,
    pub correct: u64,
    pub total: u64,
}

impl LevelTally {
    #[must_use]
    pub fn new(level: &str, side: u32) -> Self {
        Self {
            level: level.into(),
            side,
            correct: 0,
            total: 0,
        }
    }

    /// Count one case.
    #[must_use]
    pub fn record(mut self, correct: bool) -> Self {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
        self
    }

    /// `correct / total`, or 0 for an empty level. Always in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Per-level and global counters for a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    pub levels: Vec<LevelTally>,
    pub correct: u64,
    pub total: u64,
}

impl Accumulator {
    /// Fold a finished level into the batch totals.
    #[must_use]
    pub fn with_level(mut self, tally: LevelTally) -> Self {
        self.correct += tally.correct;
        self.total += tally.total;
        self.levels.push(tally);
        self
    }

    /// Unweighted mean of per-level accuracies (0 with no levels).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_level_accuracy(&self) -> f64 {
        if self.levels.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.levels.iter().map(LevelTally::accuracy).sum();
        sum / self.levels.len() as f64
    }

    /// Global `correct / total` (0 with no cases).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn global_accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Outcomes and tally for one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelScore {
    pub tally: LevelTally,
    pub outcomes: Vec<CaseOutcome>,
}

/// Result of scoring a whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub layout: BatchLayout,
    pub levels: Vec<LevelScore>,
    pub totals: Accumulator,
}

/// Score one case of `level` against its prediction record.
///
/// # Errors
///
/// Returns [`EvalError::MissingCase`] if the index is absent from the level,
/// or [`EvalError::GroundTruth`] if its start state is outside the grid or
/// missing from its own oracle.
pub fn score_case(
    level: &LevelData,
    index: u32,
    record: &PredictionRecord,
) -> Result<CaseOutcome, EvalError> {
    let case = level.case(index)?;
    let actions = record.actions();
    let (_, verdict) = verify(case.start, &actions, level.side, case.target, &case.oracle)
        .map_err(|source| EvalError::GroundTruth {
            level: level.name.clone(),
            index,
            source,
        })?;

    if verdict.is_correct() {
        debug!(
            level = %level.name,
            index,
            actions = ?actions,
            path_len = verdict.path_len,
            true_distance = verdict.true_distance,
            "correct prediction"
        );
    }

    Ok(CaseOutcome {
        index,
        actions: actions.into_iter().map(str::to_owned).collect(),
        verdict,
    })
}

/// Score every case in the layout's range for one level.
///
/// `block` holds this level's prediction records, aligned so that
/// `block[i - range.start]` belongs to case `i`.
///
/// # Errors
///
/// Returns the first error from [`score_case`], or
/// [`EvalError::BlockOutOfRange`] if `block` is shorter than the range.
pub fn score_level(
    level: &LevelData,
    block: &[PredictionRecord],
    layout: &BatchLayout,
) -> Result<LevelScore, EvalError> {
    if block.len() < layout.case_count() {
        return Err(EvalError::BlockOutOfRange {
            level: level.name.clone(),
            offset: 0,
            len: layout.case_count(),
            available: block.len(),
        });
    }

    let outcomes = layout
        .cases
        .clone()
        .zip(block)
        .map(|(index, record)| score_case(level, index, record))
        .collect::<Result<Vec<_>, _>>()?;

    let tally = outcomes
        .iter()
        .fold(LevelTally::new(&level.name, level.side.get()), |tally, o| {
            tally.record(o.verdict.is_correct())
        });

    info!(
        level = %level.name,
        correct = tally.correct,
        total = tally.total,
        accuracy = tally.accuracy(),
        "level scored"
    );

    Ok(LevelScore { tally, outcomes })
}

/// Score all levels against a flat prediction list.
///
/// # Errors
///
/// Returns [`EvalError::CaseCountMismatch`] if the list does not hold
/// exactly one block per level, [`EvalError::BlockOutOfRange`] if an offset
/// override points past the end, or the first per-case error.
pub fn evaluate(
    levels: &[LevelData],
    predictions: &[PredictionRecord],
    layout: &BatchLayout,
) -> Result<Evaluation, EvalError> {
    let expected = layout.expected_records(levels.len())?;
    if predictions.len() != expected {
        return Err(EvalError::CaseCountMismatch {
            expected,
            actual: predictions.len(),
        });
    }

    let mut scores = Vec::with_capacity(levels.len());
    let totals = levels
        .iter()
        .enumerate()
        .try_fold(Accumulator::default(), |acc, (position, level)| {
            info!(level = %level.name, side = level.side.get(), "evaluating level");
            let offset = layout.offset_for(position, &level.name)?;
            let len = layout.case_count();
            let block = predictions
                .get(offset..)
                .and_then(|rest| rest.get(..len))
                .ok_or_else(|| EvalError::BlockOutOfRange {
                    level: level.name.clone(),
                    offset,
                    len,
                    available: predictions.len(),
                })?;
            let score = score_level(level, block, layout)?;
            let acc = acc.with_level(score.tally.clone());
            scores.push(score);
            Ok::<_, EvalError>(acc)
        })?;

    Ok(Evaluation {
        layout: layout.clone(),
        levels: scores,
        totals,
    })
}

/// Human-readable summary: one line per level, then the mean.
#[must_use]
pub fn render_summary(totals: &Accumulator) -> String {
    let mut out = String::new();
    for t in &totals.levels {
        let _ = writeln!(
            out,
            "{} Accuracy: {:.4} ({}/{})",
            t.level,
            t.accuracy(),
            t.correct,
            t.total
        );
    }
    out.push_str("\n==== Final Summary ====\n");
    for t in &totals.levels {
        let _ = writeln!(
            out,
            "{:<7}: {:.4} ({}/{})",
            t.level,
            t.accuracy() * 100.0,
            t.correct,
            t.total
        );
    }
    let _ = writeln!(
        out,
        "{:<7}: {:.4}",
        "Average",
        totals.mean_level_accuracy() * 100.0
    );
    out
}

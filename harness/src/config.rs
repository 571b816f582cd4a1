//! Batch layout configuration.
//!
//! The prediction-results file is one flat list. Each level contributes a
//! contiguous block of `block_size` records, in sorted level order, and the
//! record for case `i` of a level sits at `offset + (i - range_start)`.
//!
//! [`EvalConfig`] carries optional overrides; [`EvalConfig::resolve`] fills
//! in the defaults and validates the result into a [`BatchLayout`].

use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::EvalError;

/// First evaluated case index (inclusive).
pub const DEFAULT_RANGE_START: u32 = 1000;
/// Last evaluated case index (exclusive).
pub const DEFAULT_RANGE_END: u32 = 1250;
/// Prediction records per level.
pub const DEFAULT_BLOCK_SIZE: usize = 250;

/// Overrides for the batch layout. `None` uses the default.
#[derive(Debug, Clone, Default)]
pub struct EvalConfig {
    pub range_start: Option<u32>,
    pub range_end: Option<u32>,
    pub block_size: Option<usize>,
    /// Explicit prediction offsets by level name. Levels not listed use
    /// `position * block_size`.
    pub level_offsets: Option<BTreeMap<String, usize>>,
}

/// A validated batch layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLayout {
    pub cases: Range<u32>,
    pub block_size: usize,
    level_offsets: BTreeMap<String, usize>,
}

impl EvalConfig {
    /// Resolve overrides against the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Config`] if the case range is empty or does not
    /// fit in one block.
    pub fn resolve(&self) -> Result<BatchLayout, EvalError> {
        let start = self.range_start.unwrap_or(DEFAULT_RANGE_START);
        let end = self.range_end.unwrap_or(DEFAULT_RANGE_END);
        let block_size = self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);

        if start >= end {
            return Err(EvalError::Config {
                detail: format!("case range {start}..{end} is empty"),
            });
        }
        let layout = BatchLayout {
            cases: start..end,
            block_size,
            level_offsets: self.level_offsets.clone().unwrap_or_default(),
        };
        if layout.case_count() > block_size {
            return Err(EvalError::Config {
                detail: format!(
                    "case range {start}..{end} has {} cases but blocks hold {block_size}",
                    layout.case_count()
                ),
            });
        }
        Ok(layout)
    }
}

impl Default for BatchLayout {
    fn default() -> Self {
        Self {
            cases: DEFAULT_RANGE_START..DEFAULT_RANGE_END,
            block_size: DEFAULT_BLOCK_SIZE,
            level_offsets: BTreeMap::new(),
        }
    }
}

impl BatchLayout {
    /// Number of cases evaluated per level.
    #[must_use]
    pub fn case_count(&self) -> usize {
        (self.cases.end - self.cases.start) as usize
    }

    /// Prediction offset for the level at `position` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Config`] if `position * block_size` overflows.
    pub fn offset_for(&self, position: usize, level: &str) -> Result<usize, EvalError> {
        match self.level_offsets.get(level) {
            Some(&offset) => Ok(offset),
            None => self.blocks_span(position),
        }
    }

    /// Prediction records expected for `level_count` levels.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Config`] if `level_count * block_size` overflows.
    pub fn expected_records(&self, level_count: usize) -> Result<usize, EvalError> {
        self.blocks_span(level_count)
    }

    fn blocks_span(&self, blocks: usize) -> Result<usize, EvalError> {
        blocks
            .checked_mul(self.block_size)
            .ok_or_else(|| EvalError::Config {
                detail: format!(
                    "{blocks} blocks of {} records overflow the record index",
                    self.block_size
                ),
            })
    }
}

//! Token counters
//!
//! Both counters refuse empty input with [`FreqError::EmptyText`] instead of
//! returning an empty table, so an empty transcript is reported rather than
//! silently producing an empty CSV.

use crate::errors::{FreqError, Result};
use crate::pipeline::artifacts::TokenStream;
use crate::pipeline::observer::STAGE_COUNT;

use super::FrequencyTable;

/// Separator between the tokens of an n-gram key.
pub const NGRAM_SEPARATOR: &str = "_";

/// Counts single tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl WordCounter {
    pub fn count(&self, tokens: &TokenStream) -> Result<FrequencyTable> {
        if tokens.is_empty() {
            return Err(FreqError::EmptyText { stage: STAGE_COUNT });
        }
        let mut table = FrequencyTable::new();
        for token in tokens.iter() {
            table.record(token);
        }
        Ok(table)
    }
}

/// Counts runs of `n` adjacent tokens, keyed as `tok1_tok2_..`.
#[derive(Debug, Clone, Copy)]
pub struct NgramCounter {
    n: usize,
}

impl Default for NgramCounter {
    fn default() -> Self {
        Self::new(2)
    }
}

impl NgramCounter {
    /// `n` is clamped to at least 1.
    pub fn new(n: usize) -> Self {
        Self { n: n.max(1) }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Count n-grams. A stream shorter than `n` yields an empty table.
    pub fn count(&self, tokens: &TokenStream) -> Result<FrequencyTable> {
        if tokens.is_empty() {
            return Err(FreqError::EmptyText { stage: STAGE_COUNT });
        }
        let mut table = FrequencyTable::new();
        for window in tokens.tokens().windows(self.n) {
            table.record(&window.join(NGRAM_SEPARATOR));
        }
        Ok(table)
    }
}

//! Stage trait definitions for the pipeline.
//!
//! Each trait represents one processing stage boundary. [`super::runner::Pipeline`]
//! is generic over them, so stages are statically dispatched; every trait is
//! also implemented for `Box<T>`, which lets a pipeline be assembled at
//! runtime from an [`AnalysisSpec`](super::spec::AnalysisSpec).
//!
//! # Contracts
//!
//! | Stage | Input | Output | Empty input |
//! |-------|-------|--------|-------------|
//! | [`Cleaner`] | [`Transcript`] | [`CleanedText`] | empty text |
//! | [`TokenFilter`] | [`CleanedText`] | [`TokenStream`] | empty stream |
//! | [`Normalizer`] | [`TokenStream`] | [`TokenStream`] | `EmptyText` error |
//! | [`FrequencyCounter`] | [`TokenStream`] | [`FrequencyTable`] | `EmptyText` error |
//! | [`FrequencyWriter`] | [`FrequencyRows`] | side effect | writes nothing |

use crate::errors::{FreqError, Result};
use crate::frequency::{FrequencyRows, FrequencyTable, NgramCounter, WordCounter};
use crate::nlp::cleaner::MetadataCleaner;
use crate::nlp::equivalence::EquivalenceTable;
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::tokenize;
use crate::output::CsvFrequencyWriter;
use crate::pipeline::artifacts::{CleanedText, TokenStream, Transcript};
use crate::pipeline::observer::STAGE_NORMALIZE;

// ============================================================================
// Cleaner (stage 1)
// ============================================================================

/// Turns a raw transcript into lowercased, metadata-free text.
pub trait Cleaner {
    fn clean_transcript(&self, transcript: &Transcript) -> CleanedText;
}

impl Cleaner for MetadataCleaner {
    fn clean_transcript(&self, transcript: &Transcript) -> CleanedText {
        CleanedText::new(self.clean(transcript.text()))
    }
}

// ============================================================================
// TokenFilter (stage 2)
// ============================================================================

/// Tokenizes cleaned text and drops unwanted tokens, preserving order.
pub trait TokenFilter {
    fn filter_tokens(&self, cleaned: &CleanedText) -> TokenStream;
}

impl TokenFilter for StopwordFilter {
    fn filter_tokens(&self, cleaned: &CleanedText) -> TokenStream {
        self.filter(&tokenize(cleaned.as_str()))
    }
}

// ============================================================================
// Normalizer (stage 3)
// ============================================================================

/// Rewrites tokens to canonical forms.
///
/// # Contract
///
/// - Output keeps input order; every output token is non-empty and free of
///   whitespace, so a mapping may drop a token or expand it into several.
/// - Empty input is an error ([`FreqError::EmptyText`]), not an empty result.
pub trait Normalizer {
    fn normalize(&self, tokens: TokenStream) -> Result<TokenStream>;
}

impl Normalizer for EquivalenceTable {
    fn normalize(&self, tokens: TokenStream) -> Result<TokenStream> {
        if tokens.is_empty() {
            return Err(FreqError::EmptyText {
                stage: STAGE_NORMALIZE,
            });
        }
        if self.is_empty() {
            return Ok(tokens);
        }
        Ok(self.apply(&tokens))
    }
}

// ============================================================================
// FrequencyCounter (stage 4)
// ============================================================================

/// Tallies a token stream.
///
/// Empty input is an error ([`FreqError::EmptyText`]).
pub trait FrequencyCounter {
    fn count_tokens(&self, tokens: &TokenStream) -> Result<FrequencyTable>;
}

impl FrequencyCounter for WordCounter {
    fn count_tokens(&self, tokens: &TokenStream) -> Result<FrequencyTable> {
        self.count(tokens)
    }
}

impl FrequencyCounter for NgramCounter {
    fn count_tokens(&self, tokens: &TokenStream) -> Result<FrequencyTable> {
        self.count(tokens)
    }
}

// ============================================================================
// FrequencyWriter (stage 5)
// ============================================================================

/// Persists sorted rows.
pub trait FrequencyWriter {
    fn write_rows(&self, rows: &FrequencyRows) -> Result<()>;
}

impl FrequencyWriter for CsvFrequencyWriter {
    fn write_rows(&self, rows: &FrequencyRows) -> Result<()> {
        CsvFrequencyWriter::write_rows(self, rows)
    }
}

// ============================================================================
// Boxed stages (runtime composition)
// ============================================================================

impl<T: Cleaner + ?Sized> Cleaner for Box<T> {
    fn clean_transcript(&self, transcript: &Transcript) -> CleanedText {
        (**self).clean_transcript(transcript)
    }
}

impl<T: TokenFilter + ?Sized> TokenFilter for Box<T> {
    fn filter_tokens(&self, cleaned: &CleanedText) -> TokenStream {
        (**self).filter_tokens(cleaned)
    }
}

impl<T: Normalizer + ?Sized> Normalizer for Box<T> {
    fn normalize(&self, tokens: TokenStream) -> Result<TokenStream> {
        (**self).normalize(tokens)
    }
}

impl<T: FrequencyCounter + ?Sized> FrequencyCounter for Box<T> {
    fn count_tokens(&self, tokens: &TokenStream) -> Result<FrequencyTable> {
        (**self).count_tokens(tokens)
    }
}

impl<T: FrequencyWriter + ?Sized> FrequencyWriter for Box<T> {
    fn write_rows(&self, rows: &FrequencyRows) -> Result<()> {
        (**self).write_rows(rows)
    }
}

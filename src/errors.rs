//! Runtime errors for loading sources and running the pipeline.
//!
//! Spec-level diagnostics (bad config values, unknown fields) live in
//! [`crate::pipeline::errors`]; they only surface here wrapped in
//! [`FreqError::InvalidSpec`] once validation has failed.

use std::path::PathBuf;

use crate::pipeline::validation::ValidationReport;

/// Errors that can occur during a frequency-analysis run.
#[derive(Debug, thiserror::Error)]
pub enum FreqError {
    /// Reading or writing a file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stage that needs text received none.
    ///
    /// Raised by the normalize and count stages when every line was blank or
    /// every token was filtered out upstream.
    #[error("no text to {stage}: input is empty after the previous stages")]
    EmptyText { stage: &'static str },

    /// An equivalence dictionary could not be parsed.
    #[error("invalid equivalence entry in {} at line {line}: {reason}", path.display())]
    InvalidEquivalence {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// No built-in stopword list exists for the requested language.
    #[error("no built-in stopword list for language \"{0}\"")]
    UnknownLanguage(String),

    /// The analysis spec failed validation.
    #[error("invalid analysis spec: {}", .0.summary())]
    InvalidSpec(ValidationReport),

    /// CSV serialization failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FreqError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FreqError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for the empty-input condition of the normalize/count
    /// stages.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, FreqError::EmptyText { .. })
    }
}

pub type Result<T> = std::result::Result<T, FreqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_message_names_stage() {
        let err = FreqError::EmptyText { stage: "normalize" };
        assert!(err.to_string().contains("normalize"));
        assert!(err.is_empty_text());
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = FreqError::io(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("missing.txt"));
        assert!(!err.is_empty_text());
    }
}

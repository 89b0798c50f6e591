//! Analysis-spec diagnostics.

use std::fmt;

use serde::Serialize;

use super::error_code::ErrorCode;

/// One problem found in an [`AnalysisSpec`](super::spec::AnalysisSpec).
///
/// `path` is a JSON pointer into the spec (e.g. `/frequency/n`), so the same
/// diagnostic can point at a config file field or at the CLI flag that set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSpecError {
    pub code: ErrorCode,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl AnalysisSpecError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for AnalysisSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "[{}] {}: {}", self.code, path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AnalysisSpecError {}

//! Stable machine-readable codes for analysis-spec diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a spec diagnostic. Serialized as `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// `v` is not a version this crate understands.
    UnsupportedVersion,
    /// A field holds a value outside its allowed range.
    InvalidValue,
    /// A `file:` source names a path that does not exist.
    MissingSource,
    /// A field is not part of the schema.
    UnknownField,
    /// Catch-all for custom rules.
    ValidationFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::InvalidValue => "invalid_value",
            Self::MissingSource => "missing_source",
            Self::UnknownField => "unknown_field",
            Self::ValidationFailed => "validation_failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Analysis specification types.
//!
//! An [`AnalysisSpec`] describes which stage implementations a run uses: the
//! chat header layout, where stopwords and equivalences come from, how tokens
//! are counted and where the table is written. These types are the input to
//! the [`super::validation::ValidationEngine`] and to
//! [`super::runner::DynPipeline::from_spec`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "format": "auto",
//!   "sources": { "stopwords": "lang:pt", "equivalence": "file:dict.txt" },
//!   "frequency": { "mode": "words", "min_count": 2, "top": 100 },
//!   "output": { "path": "freq.csv" },
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{FreqError, Result};
use crate::nlp::cleaner::ChatFormat;
use crate::output::DEFAULT_OUTPUT_PATH;
use crate::sources::{EquivalenceSource, StopwordSource};

/// Current spec version.
pub const SPEC_VERSION: u32 = 1;

/// Top-level analysis specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    /// Chat header layout to strip.
    #[serde(default)]
    pub format: ChatFormat,

    /// Lookup-table sources.
    #[serde(default)]
    pub sources: SourceSet,

    /// Counting mode and row limits.
    #[serde(default)]
    pub frequency: FrequencySpec,

    /// Output location.
    #[serde(default)]
    pub output: OutputSpec,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    /// Used by the strict-mode validation rule.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for AnalysisSpec {
    fn default() -> Self {
        Self {
            v: SPEC_VERSION,
            format: ChatFormat::default(),
            sources: SourceSet::default(),
            frequency: FrequencySpec::default(),
            output: OutputSpec::default(),
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }
}

impl AnalysisSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a spec from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| FreqError::io(path, e))?;
        Self::from_json(&text)
    }
}

/// Where the stopword set and the equivalence table come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSet {
    #[serde(default)]
    pub stopwords: StopwordSource,

    #[serde(default)]
    pub equivalence: EquivalenceSource,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// What a frequency-table key is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyMode {
    /// One key per token.
    #[default]
    Words,
    /// One key per run of `n` adjacent tokens.
    Ngrams,
}

impl FrequencyMode {
    /// Returns the user-facing name used in JSON and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::Ngrams => "ngrams",
        }
    }
}

impl FromStr for FrequencyMode {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "words" | "word" => Ok(Self::Words),
            "ngrams" | "ngram" => Ok(Self::Ngrams),
            other => Err(format!(
                "unknown frequency mode \"{other}\" (expected words or ngrams)"
            )),
        }
    }
}

/// Counting mode and the filters applied to sorted rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrequencySpec {
    #[serde(default)]
    pub mode: FrequencyMode,

    /// N-gram size; only meaningful with `mode: ngrams` (defaults to 2).
    #[serde(default)]
    pub n: Option<usize>,

    /// Drop rows counted fewer times than this.
    #[serde(default)]
    pub min_count: Option<u64>,

    /// Keep at most this many rows.
    #[serde(default)]
    pub top: Option<usize>,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl FrequencySpec {
    /// Default n-gram size when `n` is omitted.
    pub const DEFAULT_NGRAM_SIZE: usize = 2;

    /// Effective n-gram size, or `None` in word mode.
    pub fn ngram_size(&self) -> Option<usize> {
        match self.mode {
            FrequencyMode::Words => None,
            FrequencyMode::Ngrams => Some(self.n.unwrap_or(Self::DEFAULT_NGRAM_SIZE)),
        }
    }
}

/// Where the CSV goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpec {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            unknown_fields: HashMap::new(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

/// Values set on the command line. Every `Some` replaces the matching spec
/// field; `strict` can only be switched on.
#[derive(Debug, Clone, Default)]
pub struct SpecOverrides {
    pub format: Option<ChatFormat>,
    pub mode: Option<FrequencyMode>,
    pub n: Option<usize>,
    pub stopwords: Option<StopwordSource>,
    pub equivalence: Option<EquivalenceSource>,
    pub output: Option<PathBuf>,
    pub min_count: Option<u64>,
    pub top: Option<usize>,
    pub strict: bool,
}

impl AnalysisSpec {
    /// Merge `overrides` into this spec.
    pub fn apply_overrides(&mut self, overrides: SpecOverrides) {
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(mode) = overrides.mode {
            self.frequency.mode = mode;
        }
        if overrides.n.is_some() {
            self.frequency.n = overrides.n;
        }
        if let Some(source) = overrides.stopwords {
            self.sources.stopwords = source;
        }
        if let Some(source) = overrides.equivalence {
            self.sources.equivalence = source;
        }
        if let Some(path) = overrides.output {
            self.output.path = path;
        }
        if overrides.min_count.is_some() {
            self.frequency.min_count = overrides.min_count;
        }
        if overrides.top.is_some() {
            self.frequency.top = overrides.top;
        }
        self.strict |= overrides.strict;
    }
}

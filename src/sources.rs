//! Stopword and equivalence sources
//!
//! A source names where a lookup table comes from. Sources are written as
//! short strings on the command line and in analysis specs:
//!
//! | String | Meaning |
//! |--------|---------|
//! | `none` | no table |
//! | `lang:pt` | built-in stopword list (stopwords only) |
//! | `file:path/to/list.txt` | file on disk |
//! | `pt` | bare language code (stopwords only) |
//! | `path/to/list.txt` | anything else is a file path |

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::nlp::equivalence::EquivalenceTable;
use crate::nlp::stopwords::StopwordFilter;

const NONE: &str = "none";
const LANG_PREFIX: &str = "lang:";
const FILE_PREFIX: &str = "file:";

/// Where the stopword set comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StopwordSource {
    #[default]
    None,
    Language(String),
    File(PathBuf),
}

impl StopwordSource {
    /// Load the stopword set this source names.
    pub fn load(&self) -> Result<StopwordFilter> {
        match self {
            Self::None => Ok(StopwordFilter::empty()),
            Self::Language(lang) => {
                let filter = StopwordFilter::new(lang)?;
                tracing::debug!(language = %lang, words = filter.len(), "loaded built-in stopwords");
                Ok(filter)
            }
            Self::File(path) => StopwordFilter::from_file(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }
}

impl FromStr for StopwordSource {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(NONE) {
            return Ok(Self::None);
        }
        if let Some(lang) = value.strip_prefix(LANG_PREFIX) {
            return if lang.is_empty() {
                Err("`lang:` needs a language code, e.g. `lang:pt`".to_string())
            } else {
                Ok(Self::Language(lang.to_lowercase()))
            };
        }
        if let Some(path) = value.strip_prefix(FILE_PREFIX) {
            return parse_file(path).map(Self::File);
        }
        if StopwordFilter::is_supported_language(value) {
            return Ok(Self::Language(value.to_lowercase()));
        }
        Ok(Self::File(PathBuf::from(value)))
    }
}

impl fmt::Display for StopwordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str(NONE),
            Self::Language(lang) => write!(f, "{LANG_PREFIX}{lang}"),
            Self::File(path) => write!(f, "{FILE_PREFIX}{}", path.display()),
        }
    }
}

impl TryFrom<String> for StopwordSource {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StopwordSource> for String {
    fn from(source: StopwordSource) -> Self {
        source.to_string()
    }
}

/// Where the equivalence table comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EquivalenceSource {
    #[default]
    None,
    File(PathBuf),
}

impl EquivalenceSource {
    /// Load the equivalence table this source names.
    pub fn load(&self) -> Result<EquivalenceTable> {
        match self {
            Self::None => Ok(EquivalenceTable::empty()),
            Self::File(path) => EquivalenceTable::from_file(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::None => None,
        }
    }
}

impl FromStr for EquivalenceSource {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(NONE) {
            return Ok(Self::None);
        }
        if value.starts_with(LANG_PREFIX) {
            return Err("equivalence tables have no built-in languages; use `file:<path>`".to_string());
        }
        let path = value.strip_prefix(FILE_PREFIX).unwrap_or(value);
        parse_file(path).map(Self::File)
    }
}

impl fmt::Display for EquivalenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str(NONE),
            Self::File(path) => write!(f, "{FILE_PREFIX}{}", path.display()),
        }
    }
}

impl TryFrom<String> for EquivalenceSource {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EquivalenceSource> for String {
    fn from(source: EquivalenceSource) -> Self {
        source.to_string()
    }
}

fn parse_file(path: &str) -> std::result::Result<PathBuf, String> {
    if path.is_empty() {
        Err("`file:` needs a path, e.g. `file:stopwords.txt`".to_string())
    } else {
        Ok(PathBuf::from(path))
    }
}

//! Chat metadata cleaning
//!
//! Chat exports prefix every message with a timestamp and a sender. The
//! cleaner lowercases each non-blank line and removes those headers with a
//! list of regular expressions. Removal is best-effort text substitution, not
//! a parse: a line that matches no pattern passes through lowercased and
//! trimmed.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Legacy export header: a bracketed prefix,
/// 3-4 arbitrary characters, then `dd?dd?dddd(d)?dddd?` and trailing colons.
pub const LEGACY_EXPORT_PATTERN: &str = r"\[.*?\].{3,4}\d{2}.\d{2}.\d{4,5}.\d{4}.:*";

/// `[<timestamp>] <sender>: ` at the start of a line.
pub const BRACKETED_HEADER_PATTERN: &str = r"^\[[^\]]*\]\s*[^:\[\]]{0,50}:\s*";

/// `d/m/yy, hh:mm[ am|pm] - <sender>: ` at the start of a line.
pub const DASHED_HEADER_PATTERN: &str =
    r"^\d{1,2}/\d{1,2}/\d{2,4},?\s+\d{1,2}:\d{2}(?::\d{2})?(?:\s*[ap]\.?\s?m\.?)?\s+-\s+[^:]{0,50}:\s*";

static LEGACY_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LEGACY_EXPORT_PATTERN).expect("legacy export pattern compiles"));
static BRACKETED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(BRACKETED_HEADER_PATTERN).expect("bracketed header pattern compiles")
});
static DASHED_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DASHED_HEADER_PATTERN).expect("dashed header pattern compiles"));

/// Which header layouts to strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatFormat {
    /// Every known layout, applied legacy → bracketed → dashed.
    #[default]
    Auto,
    /// Only the legacy export pattern.
    Legacy,
    /// `[10:15, 1/1/21] Alice: ...`
    Bracketed,
    /// `1/1/21, 10:15 - Alice: ...`
    Dashed,
}

impl ChatFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Legacy => "legacy",
            Self::Bracketed => "bracketed",
            Self::Dashed => "dashed",
        }
    }

    fn patterns(&self) -> Vec<Regex> {
        match self {
            Self::Auto => vec![
                LEGACY_EXPORT.clone(),
                BRACKETED_HEADER.clone(),
                DASHED_HEADER.clone(),
            ],
            Self::Legacy => vec![LEGACY_EXPORT.clone()],
            Self::Bracketed => vec![BRACKETED_HEADER.clone()],
            Self::Dashed => vec![DASHED_HEADER.clone()],
        }
    }
}

impl FromStr for ChatFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "legacy" => Ok(Self::Legacy),
            "bracketed" | "ios" => Ok(Self::Bracketed),
            "dashed" | "android" => Ok(Self::Dashed),
            other => Err(format!(
                "unknown chat format \"{other}\" (expected auto, legacy, bracketed or dashed)"
            )),
        }
    }
}

/// Line terminators: `\n`, `\r`, vertical tab, form feed, the ASCII
/// file/group/record separators, NEL, and the Unicode line and paragraph
/// separators. `\r\n` splits twice; the empty piece between is dropped.
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Strips per-line chat metadata and lowercases the text.
#[derive(Debug, Clone)]
pub struct MetadataCleaner {
    patterns: Vec<Regex>,
}

impl Default for MetadataCleaner {
    fn default() -> Self {
        Self::new(ChatFormat::Auto)
    }
}

impl MetadataCleaner {
    /// Create a cleaner for the given export layout.
    pub fn new(format: ChatFormat) -> Self {
        Self {
            patterns: format.patterns(),
        }
    }

    /// Create a cleaner from custom patterns, applied in order.
    pub fn from_patterns(patterns: &[&str]) -> std::result::Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// A cleaner that only trims and lowercases.
    pub fn lowercase_only() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn num_patterns(&self) -> usize {
        self.patterns.len()
    }

    /// Lowercase one line, strip every pattern match, trim the result.
    pub fn clean_line(&self, line: &str) -> String {
        let mut out = line.trim().to_lowercase();
        for pattern in &self.patterns {
            if pattern.is_match(&out) {
                out = pattern.replace_all(&out, "").into_owned();
            }
        }
        out.trim().to_string()
    }

    /// Clean multi-line text.
    ///
    /// Any of [`is_line_break`] ends a line, so `\r`-only exports clean the
    /// same as `\n` ones. Lines that are blank before cleaning are dropped;
    /// the rest are joined with `\n`.
    pub fn clean(&self, text: &str) -> String {
        text.split(is_line_break)
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.clean_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

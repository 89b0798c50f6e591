//! First-class pipeline artifacts.
//!
//! Each type is the full output of one stage and the full input of the next;
//! no stage ever sees a partial artifact.
//!
//! The frequency-table artifacts live in [`crate::frequency`].

use std::path::{Path, PathBuf};

use crate::errors::{FreqError, Result};

/// Raw transcript text as read from disk (or handed in directly).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
    source: Option<PathBuf>,
}

impl Transcript {
    /// Wrap in-memory text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    /// Read a transcript file in its entirety.
    ///
    /// A missing or unreadable file is fatal for the run; there is no retry.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| FreqError::io(path, e))?;
        Ok(Self {
            text,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Path the transcript was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Output of the cleaner: lowercased, metadata-free lines joined by `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedText(String);

impl CleanedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of lines that survived cleaning.
    pub fn num_lines(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.lines().count()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordered whitespace-delimited tokens.
///
/// Order is meaningful until counting (n-gram mode depends on it); after the
/// count stage only the frequency table survives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<String>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stream from anything string-like.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Text form of the stream: tokens joined by single spaces.
    pub fn to_text(&self) -> String {
        self.tokens.join(" ")
    }
}

impl FromIterator<String> for TokenStream {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for TokenStream {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(str::to_string).collect(),
        }
    }
}

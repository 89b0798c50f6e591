//! Stopword filtering
//!
//! This module provides stopword filtering backed by the `stop-words` crate's
//! built-in lists, plain-text word lists, or explicit in-memory lists.

use std::path::Path;

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

use crate::errors::{FreqError, Result};
use crate::pipeline::artifacts::TokenStream;

/// Language codes with a built-in list.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "en", "de", "fr", "es", "it", "pt", "nl", "ru", "sv", "no", "da", "fi", "hu", "tr", "pl",
    "ar",
];

/// A filter for removing stopwords from a token stream
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    /// Set of stopwords (lowercase unless case-sensitive)
    stopwords: FxHashSet<String>,
    /// Whether lookups are case-sensitive
    case_sensitive: bool,
}

impl StopwordFilter {
    /// Create a filter from the built-in list for `language`.
    ///
    /// Accepts ISO codes (`pt`) and English names (`portuguese`).
    pub fn new(language: &str) -> Result<Self> {
        let lang = Self::resolve_language(language)
            .ok_or_else(|| FreqError::UnknownLanguage(language.to_string()))?;
        let stopwords = get(lang).iter().map(|s| s.to_string()).collect();
        Ok(Self {
            stopwords,
            case_sensitive: false,
        })
    }

    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a stopword filter from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        let stopwords = words.iter().map(|w| w.to_lowercase()).collect();
        Self {
            stopwords,
            case_sensitive: false,
        }
    }

    /// Load a word list: one word per line, blank lines and `#` comments
    /// ignored.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| FreqError::io(path, e))?;
        let filter = Self::parse_list(&text);
        tracing::debug!(path = %path.display(), words = filter.len(), "loaded stopword file");
        Ok(filter)
    }

    /// Parse the contents of a word-list file.
    pub fn parse_list(text: &str) -> Self {
        let stopwords = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self {
            stopwords,
            case_sensitive: false,
        }
    }

    /// Set case sensitivity
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.insert(word.to_lowercase());
        }
    }

    /// Remove stopwords from the filter
    pub fn remove_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.remove(&word.to_lowercase());
        }
    }

    /// Check if a word is a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        if self.case_sensitive {
            self.stopwords.contains(word)
        } else {
            self.stopwords.contains(&word.to_lowercase())
        }
    }

    /// Keep the tokens that are not stopwords, in their original order.
    pub fn filter(&self, tokens: &TokenStream) -> TokenStream {
        tokens
            .iter()
            .filter(|token| !self.is_stopword(token))
            .collect()
    }

    /// Get the number of stopwords in the filter
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }

    /// Returns `true` if `language` names a built-in list.
    pub fn is_supported_language(language: &str) -> bool {
        Self::resolve_language(language).is_some()
    }

    fn resolve_language(language: &str) -> Option<LANGUAGE> {
        let lang = match language.to_lowercase().as_str() {
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "ru" | "russian" => LANGUAGE::Russian,
            "sv" | "swedish" => LANGUAGE::Swedish,
            "no" | "norwegian" => LANGUAGE::Norwegian,
            "da" | "danish" => LANGUAGE::Danish,
            "fi" | "finnish" => LANGUAGE::Finnish,
            "hu" | "hungarian" => LANGUAGE::Hungarian,
            "tr" | "turkish" => LANGUAGE::Turkish,
            "pl" | "polish" => LANGUAGE::Polish,
            "ar" | "arabic" => LANGUAGE::Arabic,
            _ => return None,
        };
        Some(lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_english_stopwords() {
        let filter = StopwordFilter::new("en").unwrap();

        assert!(filter.is_stopword("the"));
        assert!(filter.is_stopword("The")); // case insensitive
        assert!(filter.is_stopword("is"));
        assert!(!filter.is_stopword("machine"));
    }

    #[test]
    fn test_portuguese_stopwords() {
        let filter = StopwordFilter::new("portuguese").unwrap();

        assert!(filter.is_stopword("de"));
        assert!(filter.is_stopword("que"));
        assert!(!filter.is_stopword("conversa"));
    }

    #[test]
    fn test_unknown_language_is_error() {
        let err = StopwordFilter::new("klingon").unwrap_err();
        assert!(matches!(err, FreqError::UnknownLanguage(ref l) if l == "klingon"));
        assert!(!StopwordFilter::is_supported_language("klingon"));
        assert!(StopwordFilter::is_supported_language("PT"));
    }

    #[test]
    fn test_custom_stopwords() {
        let mut filter = StopwordFilter::from_list(&["custom", "words"]);

        assert!(filter.is_stopword("custom"));
        assert!(filter.is_stopword("words"));
        assert!(!filter.is_stopword("the"));

        filter.add_stopwords(&["extra"]);
        assert!(filter.is_stopword("extra"));

        filter.remove_stopwords(&["custom"]);
        assert!(!filter.is_stopword("custom"));
    }

    #[test]
    fn test_empty_filter() {
        let filter = StopwordFilter::empty();

        assert!(!filter.is_stopword("the"));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_case_sensitivity() {
        let filter = StopwordFilter::from_list(&["the"]).with_case_sensitive(true);

        assert!(filter.is_stopword("the"));
        assert!(!filter.is_stopword("The"));
    }

    #[test]
    fn test_parse_list_skips_comments_and_blanks() {
        let filter = StopwordFilter::parse_list("# pronouns\neu\n\n  Tu  \n#ele\n");
        assert_eq!(filter.len(), 2);
        assert!(filter.is_stopword("eu"));
        assert!(filter.is_stopword("tu"));
        assert!(!filter.is_stopword("ele"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a\nthe\nof").unwrap();

        let filter = StopwordFilter::from_file(file.path()).unwrap();
        assert_eq!(filter.len(), 3);
        assert!(filter.is_stopword("of"));
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StopwordFilter::from_file(dir.path().join("stop.txt")).unwrap_err();
        assert!(matches!(err, FreqError::Io { .. }));
    }

    #[test]
    fn test_filter_preserves_order() {
        let filter = StopwordFilter::from_list(&["a", "the"]);
        let tokens = TokenStream::from_tokens(&["the", "cat", "saw", "a", "dog", "the"]);

        let kept = filter.filter(&tokens);
        assert_eq!(kept.tokens(), &["cat", "saw", "dog"]);
    }

    #[test]
    fn test_filter_does_not_strip_punctuation() {
        let filter = StopwordFilter::from_list(&["the"]);
        let tokens = TokenStream::from_tokens(&["the,", "the"]);

        assert_eq!(filter.filter(&tokens).tokens(), &["the,"]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn filtered_tokens_never_contain_stopwords(
                words in proptest::collection::vec("[a-e]{1,2}", 0..40),
                stops in proptest::collection::vec("[a-e]{1,2}", 0..6),
            ) {
                let stop_refs: Vec<&str> = stops.iter().map(String::as_str).collect();
                let filter = StopwordFilter::from_list(&stop_refs);
                let kept = filter.filter(&TokenStream::from_tokens(&words));

                prop_assert!(kept.iter().all(|t| !filter.is_stopword(t)));
                let expected = words.iter().filter(|w| !stops.contains(w)).count();
                prop_assert_eq!(kept.len(), expected);
            }
        }
    }
}

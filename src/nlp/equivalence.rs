//! Equivalence (synonym) tables
//!
//! An [`EquivalenceTable`] maps surface forms to a canonical form so that
//! variants such as `goodnight` / `good_night` are counted together. Mapping
//! is a total per-token function: a token that is a key is replaced by the
//! whitespace-separated words of its value, every other token passes through
//! unchanged. An empty value removes the token; `gn -> good night` yields two
//! tokens.
//!
//! Two on-disk layouts are understood:
//!
//! - **JSON** (`.json`): an object of `"surface": "canonical"` strings.
//! - **Dictionary** (anything else): one entry per line,
//!   `surface<TAB>canonical[<TAB>...]`, as in Iramuteq expression
//!   dictionaries. Lines without a tab are split on the first run of
//!   whitespace. Blank lines and `#` comments are skipped.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::errors::{FreqError, Result};
use crate::pipeline::artifacts::TokenStream;

/// Immutable-once-loaded mapping from surface form to canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceTable {
    map: FxHashMap<String, String>,
}

impl EquivalenceTable {
    /// Create an empty table (every token maps to itself).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from explicit pairs. Surface forms are lowercased to
    /// match cleaned text.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut table = Self::empty();
        for (surface, canonical) in pairs {
            table.insert(surface, canonical);
        }
        table
    }

    /// Load a table from disk, picking the layout from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| FreqError::io(path, e))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let table = if is_json {
            Self::parse_json(&text).map_err(|e| FreqError::InvalidEquivalence {
                path: path.to_path_buf(),
                line: e.line(),
                reason: e.to_string(),
            })?
        } else {
            Self::parse_dictionary(&text).map_err(|(line, reason)| {
                FreqError::InvalidEquivalence {
                    path: path.to_path_buf(),
                    line,
                    reason,
                }
            })?
        };

        tracing::debug!(path = %path.display(), entries = table.len(), "loaded equivalence table");
        Ok(table)
    }

    /// Parse a JSON object of surface → canonical strings.
    pub fn parse_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        let raw: FxHashMap<String, String> = serde_json::from_str(text)?;
        let mut table = Self::empty();
        for (surface, canonical) in &raw {
            table.insert(surface, canonical);
        }
        Ok(table)
    }

    /// Parse the line-oriented dictionary layout.
    ///
    /// On failure returns the 1-based line number and a reason.
    pub fn parse_dictionary(text: &str) -> std::result::Result<Self, (usize, String)> {
        let mut table = Self::empty();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (surface, canonical) = if line.contains('\t') {
                let mut fields = line.split('\t');
                let surface = fields.next().unwrap_or("").trim();
                let canonical = fields.next().unwrap_or("").trim();
                (surface, canonical)
            } else {
                match line.split_once(char::is_whitespace) {
                    Some((surface, rest)) => {
                        let canonical = rest.split_whitespace().next().unwrap_or("");
                        (surface, canonical)
                    }
                    None => (line, ""),
                }
            };

            if surface.is_empty() || canonical.is_empty() {
                return Err((idx + 1, format!("expected `surface<TAB>canonical`, got {line:?}")));
            }
            table.insert(surface, canonical);
        }
        Ok(table)
    }

    /// Add one entry.
    ///
    /// Surface forms containing whitespace can never equal a single token;
    /// they are skipped and `false` is returned.
    pub fn insert(&mut self, surface: &str, canonical: &str) -> bool {
        let surface = surface.trim();
        if surface.is_empty() || surface.contains(char::is_whitespace) {
            tracing::debug!(surface, "skipping multi-word equivalence entry");
            return false;
        }
        self.map
            .insert(surface.to_lowercase(), canonical.trim().to_string());
        true
    }

    /// Canonical form for `token`, if it has one.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.map.get(token).map(String::as_str)
    }

    /// Map a single token: its canonical form, or the token itself.
    pub fn map_token<'a>(&'a self, token: &'a str) -> &'a str {
        self.get(token).unwrap_or(token)
    }

    /// Map every token of a stream, preserving order, and re-split the
    /// mapped values on whitespace.
    pub fn apply(&self, tokens: &TokenStream) -> TokenStream {
        tokens
            .iter()
            .flat_map(|token| self.map_token(token).split_whitespace())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_maps_known_tokens_only() {
        let table = EquivalenceTable::from_pairs(&[("goodnight", "good_night")]);
        let tokens = TokenStream::from_tokens(&["goodnight", "moon", "goodnight"]);

        let mapped = table.apply(&tokens);
        assert_eq!(mapped.tokens(), &["good_night", "moon", "good_night"]);
    }

    #[test]
    fn test_values_are_resplit_on_whitespace() {
        let table = EquivalenceTable::parse_json(r#"{"uh": "", "gn": "good night"}"#).unwrap();
        let tokens = TokenStream::from_tokens(&["uh", "ok", "gn", "gn", "night"]);

        let mapped = table.apply(&tokens);
        assert_eq!(
            mapped.tokens(),
            &["ok", "good", "night", "good", "night", "night"]
        );
        assert!(mapped.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_empty_table_is_identity() {
        let table = EquivalenceTable::empty();
        let tokens = TokenStream::from_tokens(&["a", "b"]);
        assert_eq!(table.apply(&tokens), tokens);
    }

    #[test]
    fn test_mapping_is_not_transitive() {
        let table = EquivalenceTable::from_pairs(&[("a", "b"), ("b", "c")]);
        assert_eq!(table.map_token("a"), "b");
        assert_eq!(table.map_token("b"), "c");
    }

    #[test]
    fn test_surface_forms_are_lowercased() {
        let table = EquivalenceTable::from_pairs(&[("GoodNight", "good_night")]);
        assert_eq!(table.get("goodnight"), Some("good_night"));
    }

    #[test]
    fn test_multi_word_surface_is_skipped() {
        let mut table = EquivalenceTable::empty();
        assert!(!table.insert("a fim de", "a_fim_de"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_dictionary_tab_layout() {
        let text = "# iramuteq\nvc\tvocê\tpro\nblz\tbeleza\n\n";
        let table = EquivalenceTable::parse_dictionary(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("vc"), Some("você"));
        assert_eq!(table.get("blz"), Some("beleza"));
    }

    #[test]
    fn test_parse_dictionary_whitespace_layout() {
        let table = EquivalenceTable::parse_dictionary("goodnight good_night\nthx   thanks").unwrap();
        assert_eq!(table.get("goodnight"), Some("good_night"));
        assert_eq!(table.get("thx"), Some("thanks"));
    }

    #[test]
    fn test_parse_dictionary_rejects_single_field() {
        let err = EquivalenceTable::parse_dictionary("ok okay\nlonely\n").unwrap_err();
        assert_eq!(err.0, 2);
    }

    #[test]
    fn test_parse_json() {
        let table = EquivalenceTable::parse_json(r#"{ "goodnight": "good_night" }"#).unwrap();
        assert_eq!(table.get("goodnight"), Some("good_night"));
        assert!(EquivalenceTable::parse_json("[1, 2]").is_err());
    }

    #[test]
    fn test_from_file_picks_layout_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("map.json");
        std::fs::write(&json_path, r#"{"thx": "thanks"}"#).unwrap();
        let table = EquivalenceTable::from_file(&json_path).unwrap();
        assert_eq!(table.get("thx"), Some("thanks"));

        let dict_path = dir.path().join("map.txt");
        let mut file = std::fs::File::create(&dict_path).unwrap();
        writeln!(file, "thx\tthanks").unwrap();
        let table = EquivalenceTable::from_file(&dict_path).unwrap();
        assert_eq!(table.get("thx"), Some("thanks"));
    }

    #[test]
    fn test_from_file_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "ok okay\nbroken\n").unwrap();

        let err = EquivalenceTable::from_file(&path).unwrap_err();
        assert!(matches!(err, FreqError::InvalidEquivalence { line: 2, .. }));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mapping_is_total_per_token(
                words in proptest::collection::vec("[a-d]{1,2}", 0..30),
                keys in proptest::collection::vec("[a-d]{1,2}", 0..5),
            ) {
                let pairs: Vec<(String, String)> =
                    keys.iter().map(|k| (k.clone(), format!("{k}_canon"))).collect();
                let pair_refs: Vec<(&str, &str)> =
                    pairs.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
                let table = EquivalenceTable::from_pairs(&pair_refs);

                let input = TokenStream::from_tokens(&words);
                let output = table.apply(&input);
                prop_assert_eq!(input.len(), output.len());
                for (before, after) in input.iter().zip(output.iter()) {
                    match table.get(before) {
                        Some(canonical) => prop_assert_eq!(after, canonical),
                        None => prop_assert_eq!(after, before),
                    }
                }
                prop_assert!(output.iter().all(|t| !t.is_empty() && !t.contains(char::is_whitespace)));
            }
        }
    }
}

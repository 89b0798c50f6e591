//! Frequency tables and output rows
//!
//! [`FrequencyTable`] tallies tokens and remembers the order in which each key
//! was first seen; [`FrequencyRows`] is the sorted, writer-facing view.

pub mod counter;

use rustc_hash::FxHashMap;
use serde::Serialize;

pub use counter::{NgramCounter, WordCounter};

/// Token → occurrence count, with first-sighting order preserved.
///
/// Keys are stored once in `entries`; `index` maps a key to its slot so that
/// repeated sightings are an O(1) increment.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    index: FxHashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sighting of `token`: 1 on the first, +1 afterwards.
    pub fn record(&mut self, token: &str) {
        self.record_n(token, 1);
    }

    /// Record `n` sightings of `token` at once.
    pub fn record_n(&mut self, token: &str, n: u64) {
        match self.index.get(token) {
            Some(&slot) => self.entries[slot].1 += n,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), n));
            }
        }
    }

    /// Count for `token`, 0 if never seen.
    pub fn count(&self, token: &str) -> u64 {
        self.index
            .get(token)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Iterate `(token, count)` in first-sighting order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(token, count)| (token.as_str(), *count))
    }

    /// Sort into rows by count descending.
    ///
    /// The sort is stable, so equal counts keep first-sighting order.
    pub fn into_rows(self) -> FrequencyRows {
        let mut rows: Vec<FrequencyRow> = self
            .entries
            .into_iter()
            .map(|(token, count)| FrequencyRow { token, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        FrequencyRows { rows }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyRow {
    pub token: String,
    pub count: u64,
}

/// Rows ordered by count, non-increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyRows {
    rows: Vec<FrequencyRow>,
}

impl FrequencyRows {
    pub fn rows(&self) -> &[FrequencyRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrequencyRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop rows whose count is below `min_count`.
    pub fn retain_min_count(&mut self, min_count: u64) {
        self.rows.retain(|row| row.count >= min_count);
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }

    /// Returns `true` if counts never increase from one row to the next.
    pub fn is_descending(&self) -> bool {
        self.rows.windows(2).all(|pair| pair[0].count >= pair[1].count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(tokens: &[&str]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for token in tokens {
            table.record(token);
        }
        table
    }

    #[test]
    fn test_record_initializes_then_increments() {
        let table = table_of(&["hello", "hello", "world"]);
        assert_eq!(table.count("hello"), 2);
        assert_eq!(table.count("world"), 1);
        assert_eq!(table.count("missing"), 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_iter_is_first_sighting_order() {
        let table = table_of(&["b", "a", "b", "c"]);
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rows_sorted_descending() {
        let rows = table_of(&["hello", "world", "hello"]).into_rows();
        assert_eq!(
            rows.rows(),
            &[
                FrequencyRow { token: "hello".into(), count: 2 },
                FrequencyRow { token: "world".into(), count: 1 },
            ]
        );
        assert!(rows.is_descending());
    }

    #[test]
    fn test_ties_keep_first_sighting_order() {
        let rows = table_of(&["z", "y", "x", "y", "z", "x", "w"]).into_rows();
        let tokens: Vec<_> = rows.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["z", "y", "x", "w"]);
    }

    #[test]
    fn test_row_limits() {
        let mut rows = table_of(&["a", "a", "a", "b", "b", "c"]).into_rows();
        rows.retain_min_count(2);
        assert_eq!(rows.len(), 2);
        rows.truncate(1);
        assert_eq!(rows.rows()[0].token, "a");
    }

    #[test]
    fn test_record_n() {
        let mut table = FrequencyTable::new();
        table.record_n("a", 3);
        table.record("a");
        assert_eq!(table.count("a"), 4);
        assert!(table.contains("a"));
    }

    #[test]
    fn test_empty_table_rows() {
        let rows = FrequencyTable::new().into_rows();
        assert!(rows.is_empty());
        assert!(rows.is_descending());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rows_are_descending_and_sum_to_total(
                words in proptest::collection::vec("[a-f]{1,2}", 0..60)
            ) {
                let refs: Vec<&str> = words.iter().map(String::as_str).collect();
                let table = table_of(&refs);
                prop_assert_eq!(table.total(), words.len() as u64);

                let rows = table.into_rows();
                prop_assert!(rows.is_descending());
                let sum: u64 = rows.iter().map(|r| r.count).sum();
                prop_assert_eq!(sum, words.len() as u64);
            }
        }
    }
}

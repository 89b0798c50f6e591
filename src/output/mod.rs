//! Frequency-table writers
//!
//! This module serializes sorted [`crate::frequency::FrequencyRows`] as CSV.

pub mod writer;

pub use writer::{CsvFrequencyWriter, DEFAULT_OUTPUT_PATH};

//! Text-normalization components
//!
//! This module provides metadata cleaning, whitespace tokenization, stopword
//! filtering and equivalence (synonym) mapping.

pub mod cleaner;
pub mod equivalence;
pub mod stopwords;
pub mod tokenizer;

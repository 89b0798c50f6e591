//! Whitespace tokenization
//!
//! Tokens are maximal runs of non-whitespace characters. Punctuation is not
//! stripped: `"hello,"` and `"hello"` are different tokens.

use crate::pipeline::artifacts::TokenStream;

/// Split text into whitespace-delimited tokens.
pub fn tokenize(text: &str) -> TokenStream {
    text.split_whitespace().collect()
}

/// Count tokens without allocating them.
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

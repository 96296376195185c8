//! N-gram modeling and generation over token sequences.
//!
//! This module provides:
//! - Fixed-order n-gram models (`NGramModel`) with their bags of next tokens (`State`)
//! - Perplexity scoring against a held-out corpus (`perplexity`)
//! - Search over a range of orders for the best model (`selector`)
//! - Code-aware continuation of a token prefix (`Generator`)

/// Opaque string unit produced by a tokenizer; equality is exact match.
pub type Token = String;

/// Token opening every tokenized fragment.
pub const START_TOKEN: &str = "<s>";

/// Token closing every tokenized fragment.
pub const END_TOKEN: &str = "</s>";

/// Lazy, bounded continuation of a prefix with code-aware halting rules.
pub mod generator;

/// Fixed-order n-gram model (`n >= 2`).
///
/// Handles counting, maximum-likelihood estimation, merging, and persistence.
pub mod ngram_model;

/// Perplexity of a model over an evaluation corpus.
pub mod perplexity;

/// A predicted token with its probability.
pub mod prediction;

/// Perplexity-driven search across model orders.
pub mod selector;

/// Bag of next tokens observed after one context.
pub mod state;

#[cfg(test)]
pub(crate) fn tokens(items: &[&str]) -> Vec<Token> {
	items.iter().map(|item| (*item).to_owned()).collect()
}

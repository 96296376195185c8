use super::ngram_model::NGramModel;
use super::Token;
use crate::error::{NgramError, Result};

/// Probability used in place of 0 for unseen n-grams.
///
/// Keeps `log2` finite while still heavily penalizing the miss.
pub const SMOOTHING_FLOOR: f64 = 1e-10;

/// Computes the perplexity of `model` over `corpus`.
///
/// Every position from `n-1` on is scored against its `n-1` preceding
/// tokens; `log2(p)` is accumulated, with `p` replaced by
/// [`SMOOTHING_FLOOR`] when the model gives it 0. The result is
/// `2^(-total_log_prob / total_tokens)`, always >= 1.
///
/// # Errors
/// [`NgramError::EmptyEvaluationSet`] if no position could be scored
/// (empty corpus, or every sequence too short for the model).
pub fn perplexity(corpus: &[Vec<Token>], model: &NGramModel) -> Result<f64> {
	let n = model.n();
	let mut total_log_prob = 0.0;
	let mut total_tokens: usize = 0;

	for sequence in corpus {
		for window in sequence.windows(n) {
			let (context, next) = window.split_at(n - 1);
			let probability = model.probability_of(context, &next[0]);
			total_log_prob += if probability > 0.0 {
				probability.log2()
			} else {
				SMOOTHING_FLOOR.log2()
			};
			total_tokens += 1;
		}
	}

	if total_tokens == 0 {
		return Err(NgramError::EmptyEvaluationSet { n });
	}

	let avg_log_prob = total_log_prob / total_tokens as f64;
	Ok((-avg_log_prob).exp2())
}

use std::path::Path;

use log::info;

use super::ngram_model::NGramModel;
use super::perplexity::perplexity;
use super::Token;
use crate::config::SelectionConfig;
use crate::error::{NgramError, Result};

/// Outcome of a model search.
///
/// Only the winning model is kept; losing candidates survive as scores.
#[derive(Debug, Clone)]
pub struct Selection {
	pub model: NGramModel,
	/// Order of the winning model.
	pub n: usize,
	/// Perplexity of the winner on the test corpus, `None` when loaded from disk.
	pub test_perplexity: Option<f64>,
	/// Perplexity of the winner on the validation corpus.
	pub validation_perplexity: f64,
	/// `(n, test perplexity)` for every candidate, in search order.
	pub candidates: Vec<(usize, f64)>,
}

/// Training, test, and validation corpora handed to the search.
#[derive(Debug, Clone, Copy)]
pub struct Corpora<'a> {
	pub train: &'a [Vec<Token>],
	pub test: &'a [Vec<Token>],
	pub validation: &'a [Vec<Token>],
}

/// Returns the `n` with the lowest score.
///
/// Ties keep the first candidate seen. `None` on an empty slice.
pub fn pick_best(candidates: &[(usize, f64)]) -> Option<usize> {
	candidates
		.iter()
		.fold(None, |best: Option<(usize, f64)>, &(n, score)| match best {
			Some((_, best_score)) if best_score <= score => best,
			_ => Some((n, score)),
		})
		.map(|(n, _)| n)
}

/// Searches `[min_n, max_n]` for the model with the lowest test perplexity.
///
/// Every candidate is trained on `corpora.train` and scored on
/// `corpora.test`; no candidate is skipped. The winner is then scored on
/// `corpora.validation` for an unbiased final figure.
pub fn select_best(corpora: Corpora<'_>, config: &SelectionConfig) -> Result<Selection> {
	config.validate()?;

	let mut candidates = Vec::new();
	let mut best: Option<(NGramModel, f64)> = None;

	for n in config.min_n..=config.max_n {
		info!("training {n}-gram model on {} sequences", corpora.train.len());
		let model = NGramModel::train(corpora.train, n)?;
		let score = perplexity(corpora.test, &model)?;
		info!("{n}-gram model: {} contexts, test perplexity {score:.4}", model.len());
		candidates.push((n, score));

		// Losing models are dropped as soon as they are beaten
		if pick_best(&candidates) == Some(n) {
			best = Some((model, score));
		}
	}

	let (model, test_score) =
		best.ok_or_else(|| NgramError::InvalidConfig("empty n range".to_owned()))?;
	let n = model.n();

	info!("best model is the {n}-gram model with test perplexity {test_score:.4}");
	let validation_perplexity = perplexity(corpora.validation, &model)?;
	info!("{n}-gram model validated at perplexity {validation_perplexity:.4}");

	Ok(Selection {
		model,
		n,
		test_perplexity: Some(test_score),
		validation_perplexity,
		candidates,
	})
}

/// Loads the model persisted at `path`, or searches and persists a new one.
///
/// A loaded model skips the search entirely: it is only re-scored on the
/// validation corpus.
pub fn load_or_select<P: AsRef<Path>>(
	path: P,
	corpora: Corpora<'_>,
	config: &SelectionConfig,
) -> Result<Selection> {
	let path = path.as_ref();
	if path.exists() {
		let model = NGramModel::load(path)?;
		let validation_perplexity = perplexity(corpora.validation, &model)?;
		info!(
			"reusing {}-gram model, validation perplexity {validation_perplexity:.4}",
			model.n()
		);
		return Ok(Selection {
			n: model.n(),
			model,
			test_perplexity: None,
			validation_perplexity,
			candidates: Vec::new(),
		});
	}

	let selection = select_best(corpora, config)?;
	selection.model.save(path)?;
	Ok(selection)
}

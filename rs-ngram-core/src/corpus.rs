//! Corpus loading and reproducible partitioning.

use std::collections::HashSet;
use std::path::Path;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::SplitConfig;
use crate::error::{NgramError, Result};
use crate::io;
use crate::model::Token;
use crate::tokenizer::Tokenizer;

/// Train, validation, and test partitions of a tokenized corpus.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
	pub train: Vec<Vec<Token>>,
	pub validation: Vec<Vec<Token>>,
	pub test: Vec<Vec<Token>>,
}

impl Dataset {
	/// Splits `sequences` into test first, then validation out of the rest.
	pub fn split(sequences: Vec<Vec<Token>>, config: &SplitConfig) -> Result<Self> {
		config.validate()?;
		let (rest, test) = split(sequences, config.test_ratio, config.seed)?;
		let (train, validation) = split(rest, config.validation_ratio, config.seed)?;
		info!(
			"split corpus into {} training, {} validation, {} test sequences",
			train.len(),
			validation.len(),
			test.len()
		);
		Ok(Self { train, validation, test })
	}
}

/// Reads one code fragment per line.
///
/// Blank lines are skipped and exact duplicates keep their first occurrence.
pub fn load_fragments<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
	let lines = io::read_lines(&path)?;
	let total = lines.len();
	let mut seen = HashSet::with_capacity(total);
	let fragments: Vec<String> = lines
		.into_iter()
		.filter(|line| !line.trim().is_empty())
		.filter(|line| seen.insert(line.clone()))
		.collect();
	info!(
		"loaded {} unique fragments out of {total} lines from {}",
		fragments.len(),
		path.as_ref().display()
	);
	Ok(fragments)
}

/// Tokenizes every fragment with `tokenizer`.
pub fn tokenize_all<T: Tokenizer + ?Sized>(tokenizer: &T, fragments: &[String]) -> Vec<Vec<Token>> {
	fragments.iter().map(|fragment| tokenizer.tokenize(fragment)).collect()
}

/// Shuffles `items` with a seeded RNG and splits off `round(len * ratio)` of them.
///
/// Returns `(kept, held_out)`. The same seed always yields the same split.
pub fn split<T>(mut items: Vec<T>, ratio: f64, seed: u64) -> Result<(Vec<T>, Vec<T>)> {
	if !(0.0..=1.0).contains(&ratio) {
		return Err(NgramError::InvalidConfig(format!("split ratio must be within [0, 1], got {ratio}")));
	}

	let mut rng = StdRng::seed_from_u64(seed);
	items.shuffle(&mut rng);

	let held = ((items.len() as f64) * ratio).round() as usize;
	let held_out = items.split_off(items.len() - held.min(items.len()));
	Ok((items, held_out))
}

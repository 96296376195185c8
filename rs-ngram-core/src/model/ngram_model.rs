use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::prediction::Prediction;
use super::state::State;
use super::Token;
use crate::error::{NgramError, Result};
use crate::io;

/// Number of chunks handed to each CPU when counting in parallel.
const CHUNKS_PER_CPU: usize = 8;

/// Represents an n-gram model over token sequences.
///
/// The `NGramModel` maps every context (the `n-1` tokens preceding a
/// position) to the bag of tokens observed right after it.
///
/// # Responsibilities
/// - Count n-grams over a training corpus (in parallel, chunk by chunk)
/// - Estimate maximum-likelihood probabilities for a context
/// - Report the most probable continuation of a context
/// - Merge with another model of the same order `n`
/// - Persist to and reload from disk
///
/// # Invariants
/// - `n` is always >= 2
/// - Every key in `states` holds exactly `n-1` tokens
/// - Every bag is non-empty
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NGramModel {
	/// The order of the model (context length + 1)
	n: usize, // must be >= 2

	/// Mapping from a context (length n-1) to its bag of next tokens
	states: HashMap<Vec<Token>, State>,
}

impl NGramModel {
	/// Creates an empty n-gram model of order `n`.
	///
	/// # Errors
	/// Returns an error if `n < 2`.
	pub fn new(n: usize) -> Result<Self> {
		if n < 2 {
			return Err(NgramError::InvalidConfig(format!("n must be >= 2, got {n}")));
		}
		Ok(Self { n, states: HashMap::new() })
	}

	/// Trains a model of order `n` on `corpus`.
	///
	/// The corpus is split into chunks, each counted on its own scoped
	/// thread, and the partial models are merged. Counting is a bag union,
	/// so the result does not depend on chunking or thread scheduling.
	pub fn train(corpus: &[Vec<Token>], n: usize) -> Result<Self> {
		let mut model = Self::new(n)?;
		if corpus.is_empty() {
			return Ok(model);
		}

		let chunks = num_cpus::get().max(1) * CHUNKS_PER_CPU;
		let chunk_size = corpus.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for chunk in corpus.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					// `new` cannot fail here, `n` was validated above
					let mut partial = Self { n, states: HashMap::new() };
					for sequence in chunk {
						partial.add_sequence(sequence);
					}
					// The receiver outlives the scope, sending cannot fail
					let _ = tx.send(partial);
				});
			}
		});
		drop(tx);

		for partial in rx.iter() {
			debug!("merging partial {n}-gram model with {} contexts", partial.len());
			model.merge(&partial)?;
		}

		Ok(model)
	}

	/// Adds one token sequence to the model.
	///
	/// For every position `ix` from `n-1` on, the `n-1` preceding tokens
	/// form the context and `sequence[ix]` is added to its bag.
	/// Sequences shorter than `n` tokens yield no n-gram.
	pub fn add_sequence(&mut self, sequence: &[Token]) {
		for window in sequence.windows(self.n) {
			let (context, next) = window.split_at(self.n - 1);
			// Lookup by slice first, the key is only cloned for a new context
			match self.states.get_mut(context) {
				Some(state) => state.add(&next[0]),
				None => {
					let mut state = State::new();
					state.add(&next[0]);
					self.states.insert(context.to_vec(), state);
				}
			}
		}
	}

	/// The order `n` of the model.
	pub fn n(&self) -> usize {
		self.n
	}

	/// Length of a context key, `n - 1`.
	pub fn context_len(&self) -> usize {
		self.n - 1
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Iterates over every `(context, bag)` entry.
	pub fn contexts(&self) -> impl Iterator<Item = (&[Token], &State)> {
		self.states.iter().map(|(context, state)| (context.as_slice(), state))
	}

	/// Bag of tokens observed after `context`, if any.
	pub fn state(&self, context: &[Token]) -> Option<&State> {
		self.states.get(context)
	}

	/// Most probable next token after `context`.
	///
	/// Returns `None` when the context was never observed.
	/// Ties on count go to the lexicographically smallest token.
	pub fn most_probable(&self, context: &[Token]) -> Option<Prediction> {
		let state = self.states.get(context)?;
		let (token, count) = state.most_common()?;
		Some(Prediction::new(token, count as f64 / state.total() as f64))
	}

	/// Maximum-likelihood probability of `token` following `context`.
	///
	/// Unseen contexts and unseen tokens both give 0.
	pub fn probability_of(&self, context: &[Token], token: &str) -> f64 {
		self.states.get(context).map_or(0.0, |state| state.probability(token))
	}

	/// Merges another n-gram model into this one.
	///
	/// # Errors
	/// Returns an error if the model orders do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.n != other.n {
			return Err(NgramError::InvalidConfig(format!(
				"cannot merge a {}-gram model into a {}-gram model",
				other.n, self.n
			)));
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state);
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}

	/// Serializes the model with `postcard` and writes it to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		io::write_bytes(&path, &bytes)?;
		info!(
			"saved {}-gram model ({} contexts) to {}",
			self.n,
			self.len(),
			path.as_ref().display()
		);
		Ok(())
	}

	/// Loads a model previously written by [`NGramModel::save`].
	///
	/// # Errors
	/// Fails on IO errors, undecodable bytes, or a decoded model breaking
	/// the key length / non-empty bag invariants.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = io::read_bytes(&path)?;
		let model: Self = postcard::from_bytes(&bytes)?;
		model.validate()?;
		info!(
			"loaded {}-gram model ({} contexts) from {}",
			model.n,
			model.len(),
			path.as_ref().display()
		);
		Ok(model)
	}

	fn validate(&self) -> Result<()> {
		if self.n < 2 {
			return Err(NgramError::Serialization(format!("stored model has n = {}", self.n)));
		}
		for (context, state) in &self.states {
			if context.len() != self.n - 1 {
				return Err(NgramError::Serialization(format!(
					"stored context of length {} in a {}-gram model",
					context.len(),
					self.n
				)));
			}
			if !state.is_consistent() {
				return Err(NgramError::Serialization(format!(
					"stored bag for context {context:?} is empty or inconsistent"
				)));
			}
		}
		Ok(())
	}
}

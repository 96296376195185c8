use log::debug;
use serde::{Deserialize, Serialize};

use super::ngram_model::NGramModel;
use super::prediction::Prediction;
use super::Token;
use crate::error::{NgramError, Result};

/// Length of a run of identical tokens that ends generation.
pub const MAX_REPETITIONS: usize = 5;

/// Where a generation run stands.
///
/// A run starts in `Generating` and moves to exactly one terminal state.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationStatus {
	Generating,
	/// The current context was never observed during training.
	StoppedByMiss,
	/// The sequence ended in an `A B A B` pattern before the step.
	StoppedByAlternation,
	/// The last prediction completed a run of [`MAX_REPETITIONS`] tokens.
	StoppedByRepetition,
	/// The last prediction closed a bracket that was never opened.
	StoppedByBracketImbalance,
	ReachedMaxLength,
}

impl GenerationStatus {
	pub fn is_finished(self) -> bool {
		self != Self::Generating
	}
}

/// Lazy continuation of a token prefix by a trained model.
///
/// Each step takes the last `n-1` tokens as context and appends the most
/// probable next token. Halting checks run in a fixed order:
///
/// 1. context miss: stop, nothing recorded
/// 2. `A B A B` tail (with `A != B`) before appending: stop, nothing recorded
/// 3. append, then a run of [`MAX_REPETITIONS`] equal tokens: the step is
///    recorded, then stop
/// 4. an unmatched closing bracket anywhere in the sequence: stop, the step
///    is not recorded although its token stays in [`Generator::tokens`]
///
/// At most `max_length` predictions are yielded.
#[derive(Debug)]
pub struct Generator<'a> {
	model: &'a NGramModel,
	tokens: Vec<Token>,
	predictions: Vec<Prediction>,
	max_length: usize,
	steps: usize,
	status: GenerationStatus,
}

impl<'a> Generator<'a> {
	/// Starts a fresh run from `prefix`.
	///
	/// # Errors
	/// [`NgramError::MalformedInput`] if `prefix` holds fewer than `n-1` tokens.
	pub fn new(model: &'a NGramModel, prefix: &[Token], max_length: usize) -> Result<Self> {
		if prefix.len() < model.context_len() {
			return Err(NgramError::MalformedInput(format!(
				"prefix has {} tokens, a {}-gram model needs at least {}",
				prefix.len(),
				model.n(),
				model.context_len()
			)));
		}
		Ok(Self {
			model,
			tokens: prefix.to_vec(),
			predictions: Vec::new(),
			max_length,
			steps: 0,
			status: GenerationStatus::Generating,
		})
	}

	pub fn status(&self) -> GenerationStatus {
		self.status
	}

	/// Working sequence: the prefix followed by every appended token.
	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	/// Predictions recorded so far.
	pub fn predictions(&self) -> &[Prediction] {
		&self.predictions
	}

	/// Runs to completion and returns the recorded predictions.
	pub fn run(mut self) -> (Vec<Prediction>, GenerationStatus) {
		while self.next().is_some() {}
		(self.predictions, self.status)
	}

	fn finish(&mut self, status: GenerationStatus) -> Option<Prediction> {
		debug!("generation stopped after {} steps: {status:?}", self.steps);
		self.status = status;
		None
	}

	fn record(&mut self, prediction: Prediction) -> Option<Prediction> {
		self.predictions.push(prediction.clone());
		Some(prediction)
	}
}

impl Iterator for Generator<'_> {
	type Item = Prediction;

	fn next(&mut self) -> Option<Self::Item> {
		if self.status.is_finished() {
			return None;
		}
		if self.steps >= self.max_length {
			return self.finish(GenerationStatus::ReachedMaxLength);
		}
		self.steps += 1;

		let context = &self.tokens[self.tokens.len() - self.model.context_len()..];
		let Some(prediction) = self.model.most_probable(context) else {
			return self.finish(GenerationStatus::StoppedByMiss);
		};

		if ends_alternating(&self.tokens) {
			return self.finish(GenerationStatus::StoppedByAlternation);
		}

		self.tokens.push(prediction.token.clone());

		if ends_repeating(&self.tokens, MAX_REPETITIONS) {
			self.status = GenerationStatus::StoppedByRepetition;
			debug!("generation stopped after {} steps: {:?}", self.steps, self.status);
			return self.record(prediction);
		}

		if !brackets_balanced(&self.tokens) {
			return self.finish(GenerationStatus::StoppedByBracketImbalance);
		}

		if self.steps >= self.max_length {
			self.status = GenerationStatus::ReachedMaxLength;
		}
		self.record(prediction)
	}
}

/// Continues `prefix` with up to `max_length` predictions from `model`.
pub fn continue_sequence(
	model: &NGramModel,
	prefix: &[Token],
	max_length: usize,
) -> Result<Vec<Prediction>> {
	Ok(Generator::new(model, prefix, max_length)?.run().0)
}

/// True when the tail reads `A B A B` with `A != B`.
fn ends_alternating(tokens: &[Token]) -> bool {
	match tokens {
		[.., a, b, c, d] => a == c && b == d && a != b,
		_ => false,
	}
}

/// True when the last `run` tokens are all equal.
fn ends_repeating(tokens: &[Token], run: usize) -> bool {
	if run == 0 || tokens.len() < run {
		return false;
	}
	let tail = &tokens[tokens.len() - run..];
	tail.windows(2).all(|pair| pair[0] == pair[1])
}

/// False as soon as a closing bracket has no matching opener.
///
/// Openers left unclosed are fine: the sequence may still be growing.
fn brackets_balanced(tokens: &[Token]) -> bool {
	let mut stack: Vec<&str> = Vec::new();
	for token in tokens {
		match token.as_str() {
			"(" | "{" | "[" => stack.push(token.as_str()),
			")" | "}" | "]" => {
				let expected = match token.as_str() {
					")" => "(",
					"}" => "{",
					_ => "[",
				};
				if stack.pop() != Some(expected) {
					return false;
				}
			}
			_ => {}
		}
	}
	true
}

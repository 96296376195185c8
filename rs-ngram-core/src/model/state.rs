use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Token;

/// Bag of next tokens observed after one context.
///
/// A `State` is the value side of an n-gram model entry: a multiset of
/// every token that followed the context in the training corpus, stored as
/// occurrence counts.
///
/// ## Invariants
/// - Each stored count is strictly positive
/// - `total` equals the sum of all counts
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct State {
	/// Next token → number of times it was observed.
	/// Example: { ";" => 42, ")" => 3 }
	transitions: HashMap<Token, usize>,
	/// Total number of observations in the bag.
	total: usize,
}

impl State {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one more occurrence of `token`.
	pub fn add(&mut self, token: &str) {
		*self.transitions.entry(token.to_owned()).or_insert(0) += 1;
		self.total += 1;
	}

	/// Number of times `token` was observed.
	pub fn count(&self, token: &str) -> usize {
		self.transitions.get(token).copied().unwrap_or(0)
	}

	/// Total number of observations.
	pub fn total(&self) -> usize {
		self.total
	}

	pub fn is_empty(&self) -> bool {
		self.total == 0
	}

	/// Iterates over `(token, count)` pairs, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.transitions.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// Maximum-likelihood probability of `token`: `count / total`.
	///
	/// Returns 0 for an empty bag.
	pub fn probability(&self, token: &str) -> f64 {
		if self.total == 0 {
			return 0.0;
		}
		self.count(token) as f64 / self.total as f64
	}

	/// The most observed token with its count.
	///
	/// Ties are broken toward the lexicographically smallest token so the
	/// answer does not depend on counting or hashing order.
	pub fn most_common(&self) -> Option<(&str, usize)> {
		self.iter().fold(None, |best, (token, count)| match best {
			Some((best_token, best_count))
				if best_count > count || (best_count == count && best_token <= token) =>
			{
				Some((best_token, best_count))
			}
			_ => Some((token, count)),
		})
	}

	/// Merges another bag into this one (bag union, counts are summed).
	///
	/// Intended for parallel learning where partial models are combined.
	pub fn merge(&mut self, other: &Self) {
		for (token, count) in &other.transitions {
			*self.transitions.entry(token.clone()).or_insert(0) += *count;
		}
		self.total += other.total;
	}

	/// Checks the count invariants, used after deserialization.
	pub(crate) fn is_consistent(&self) -> bool {
		self.total > 0
			&& self.transitions.values().all(|count| *count > 0)
			&& self.transitions.values().sum::<usize>() == self.total
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bag(tokens: &[&str]) -> State {
		let mut state = State::new();
		for token in tokens {
			state.add(token);
		}
		state
	}

	#[test]
	fn counts_and_total_track_additions() {
		let state = bag(&["c", "c", "d"]);
		assert_eq!(state.count("c"), 2);
		assert_eq!(state.count("d"), 1);
		assert_eq!(state.count("e"), 0);
		assert_eq!(state.total(), 3);
		assert!(state.is_consistent());
	}

	#[test]
	fn most_common_prefers_highest_count() {
		let state = bag(&["x", "y", "y", "z"]);
		assert_eq!(state.most_common(), Some(("y", 2)));
	}

	#[test]
	fn most_common_breaks_ties_lexicographically() {
		let state = bag(&["}", ";", "}", ";"]);
		assert_eq!(state.most_common(), Some((";", 2)));
	}

	#[test]
	fn empty_bag_has_no_winner_and_zero_probability() {
		let state = State::new();
		assert_eq!(state.most_common(), None);
		assert_eq!(state.probability("a"), 0.0);
		assert!(!state.is_consistent());
	}

	#[test]
	fn merge_sums_counts() {
		let mut left = bag(&["a", "b"]);
		left.merge(&bag(&["b", "c"]));
		assert_eq!(left.count("b"), 2);
		assert_eq!(left.total(), 4);
		assert!(left.is_consistent());
	}
}

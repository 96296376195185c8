use serde::{Deserialize, Serialize};

use super::Token;

/// A predicted next token with its maximum-likelihood probability.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Prediction {
	pub token: Token,
	pub probability: f64,
}

impl Prediction {
	pub fn new(token: impl Into<Token>, probability: f64) -> Self {
		Self { token: token.into(), probability }
	}

	/// Returns a copy with the probability rounded to `decimals` places.
	pub fn rounded(&self, decimals: u32) -> Self {
		let factor = 10f64.powi(decimals as i32);
		Self {
			token: self.token.clone(),
			probability: (self.probability * factor).round() / factor,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rounding_keeps_the_token() {
		let prediction = Prediction::new("c", 2.0 / 3.0).rounded(3);
		assert_eq!(prediction.token, "c");
		assert_eq!(prediction.probability, 0.667);
	}

	#[test]
	fn rounding_to_one_decimal() {
		assert_eq!(Prediction::new("x", 0.25).rounded(1).probability, 0.3);
	}
}

//! Corpus cleaning applied to raw code fragments before tokenization.

use std::sync::LazyLock;

use log::info;
use regex::Regex;

use crate::config::PreprocessConfig;
use crate::error::Result;

/// Setter and getter headers such as `setName(String name) {`.
static BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\bset[A-Z][a-zA-Z0-9_]*\(.*\)\s*\{|\bget[A-Z][a-zA-Z0-9_]*\(.*\)\s*\{")
		.unwrap_or_else(|err| unreachable!("boilerplate pattern is valid: {err}"))
});

/// Runs every filter enabled in `config`, in order: ASCII only, length
/// outliers, then getter/setter boilerplate.
pub fn preprocess(fragments: Vec<String>, config: &PreprocessConfig) -> Result<Vec<String>> {
	config.validate()?;
	let initial = fragments.len();

	let fragments = if config.ascii_only { filter_ascii(fragments) } else { fragments };
	info!("{} fragments after ASCII filtering", fragments.len());

	let fragments = match config.length_percentiles {
		Some((lower, upper)) => remove_outliers(fragments, lower, upper),
		None => fragments,
	};
	info!("{} fragments after removing length outliers", fragments.len());

	let fragments = if config.remove_boilerplate { remove_boilerplate(fragments) } else { fragments };
	info!("kept {} of {initial} fragments after preprocessing", fragments.len());

	Ok(fragments)
}

/// Keeps fragments made only of ASCII characters.
pub fn filter_ascii(fragments: Vec<String>) -> Vec<String> {
	fragments.into_iter().filter(|fragment| fragment.is_ascii()).collect()
}

/// Drops fragments whose character length falls outside the
/// `[lower, upper]` percentiles (0-100) of the corpus lengths.
///
/// Percentiles interpolate linearly between the closest ranks.
pub fn remove_outliers(fragments: Vec<String>, lower: f64, upper: f64) -> Vec<String> {
	if fragments.is_empty() {
		return fragments;
	}
	let mut lengths: Vec<usize> = fragments.iter().map(|fragment| fragment.chars().count()).collect();
	lengths.sort_unstable();
	let lower_bound = quantile(&lengths, lower / 100.0);
	let upper_bound = quantile(&lengths, upper / 100.0);

	fragments
		.into_iter()
		.filter(|fragment| {
			let len = fragment.chars().count() as f64;
			len >= lower_bound && len <= upper_bound
		})
		.collect()
}

/// Drops getter and setter methods.
pub fn remove_boilerplate(fragments: Vec<String>) -> Vec<String> {
	fragments.into_iter().filter(|fragment| !BOILERPLATE.is_match(fragment)).collect()
}

/// Linear-interpolated quantile of sorted, non-empty `values`.
fn quantile(values: &[usize], q: f64) -> f64 {
	let position = q.clamp(0.0, 1.0) * (values.len() - 1) as f64;
	let below = position.floor() as usize;
	let above = position.ceil() as usize;
	let fraction = position - below as f64;
	values[below] as f64 + (values[above] as f64 - values[below] as f64) * fraction
}

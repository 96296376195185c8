//! Configuration for corpus cleaning, model search, corpus splitting, and
//! report emission.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NgramError, Result};
use crate::io;

/// Largest order the search accepts.
pub const MAX_ORDER: usize = 64;

/// Range of model orders tried by the search, both ends included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SelectionConfig {
	pub min_n: usize,
	pub max_n: usize,
}

impl SelectionConfig {
	pub fn validate(&self) -> Result<()> {
		if self.min_n < 2 {
			return Err(NgramError::InvalidConfig(format!("min_n must be >= 2, got {}", self.min_n)));
		}
		if self.min_n > self.max_n {
			return Err(NgramError::InvalidConfig(format!(
				"min_n ({}) must not exceed max_n ({})",
				self.min_n, self.max_n
			)));
		}
		if self.max_n > MAX_ORDER {
			return Err(NgramError::InvalidConfig(format!(
				"max_n must be <= {MAX_ORDER}, got {}",
				self.max_n
			)));
		}
		Ok(())
	}
}

impl Default for SelectionConfig {
	fn default() -> Self {
		Self { min_n: 2, max_n: 6 }
	}
}

/// How the corpus is partitioned into train, validation, and test sets.
///
/// `test_ratio` is taken from the whole corpus first, then
/// `validation_ratio` from what remains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplitConfig {
	pub test_ratio: f64,
	pub validation_ratio: f64,
	pub seed: u64,
}

impl SplitConfig {
	pub fn validate(&self) -> Result<()> {
		for (name, ratio) in [("test_ratio", self.test_ratio), ("validation_ratio", self.validation_ratio)] {
			if !(ratio > 0.0 && ratio < 1.0) {
				return Err(NgramError::InvalidConfig(format!(
					"{name} must be strictly between 0 and 1, got {ratio}"
				)));
			}
		}
		Ok(())
	}
}

impl Default for SplitConfig {
	fn default() -> Self {
		Self { test_ratio: 0.2, validation_ratio: 0.2, seed: 42 }
	}
}

/// Shape of the completion report written for held-out sequences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
	/// Number of held-out sequences sampled, taken from the front.
	pub sample_size: usize,
	/// Number of leading tokens used as the generation prefix.
	pub seed_length: usize,
	/// Maximum number of predictions per sequence.
	pub max_length: usize,
	/// Decimal places kept on reported probabilities; `None` keeps full precision.
	pub precision: Option<u32>,
}

impl ReportConfig {
	pub fn validate(&self) -> Result<()> {
		if self.seed_length == 0 {
			return Err(NgramError::InvalidConfig("seed_length must be greater than zero".into()));
		}
		if self.max_length == 0 {
			return Err(NgramError::InvalidConfig("max_length must be greater than zero".into()));
		}
		if let Some(precision) = self.precision {
			if precision > 15 {
				return Err(NgramError::InvalidConfig(format!(
					"precision must be at most 15 decimal places, got {precision}"
				)));
			}
		}
		Ok(())
	}
}

impl Default for ReportConfig {
	fn default() -> Self {
		Self { sample_size: 100, seed_length: 10, max_length: 20, precision: None }
	}
}

/// Filters applied to raw fragments before tokenization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreprocessConfig {
	/// Drop fragments holding any non-ASCII character.
	pub ascii_only: bool,
	/// Keep only fragments whose length lies between these percentiles (0-100).
	pub length_percentiles: Option<(f64, f64)>,
	/// Drop getter and setter methods.
	pub remove_boilerplate: bool,
}

impl PreprocessConfig {
	pub fn validate(&self) -> Result<()> {
		if let Some((lower, upper)) = self.length_percentiles {
			if !(0.0..=100.0).contains(&lower) || !(0.0..=100.0).contains(&upper) {
				return Err(NgramError::InvalidConfig(format!(
					"length percentiles must lie in [0, 100], got ({lower}, {upper})"
				)));
			}
			if lower > upper {
				return Err(NgramError::InvalidConfig(format!(
					"lower percentile ({lower}) must not exceed upper percentile ({upper})"
				)));
			}
		}
		Ok(())
	}
}

impl Default for PreprocessConfig {
	fn default() -> Self {
		Self { ascii_only: true, length_percentiles: Some((5.0, 95.0)), remove_boilerplate: true }
	}
}

/// Every setting of a train-evaluate-report run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
	pub preprocess: PreprocessConfig,
	pub selection: SelectionConfig,
	pub split: SplitConfig,
	pub report: ReportConfig,
}

impl PipelineConfig {
	/// Reads a JSON configuration file; missing fields take their defaults.
	pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = io::read_bytes(path)?;
		let config: Self = serde_json::from_slice(&bytes)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		self.preprocess.validate()?;
		self.selection.validate()?;
		self.split.validate()?;
		self.report.validate()
	}
}

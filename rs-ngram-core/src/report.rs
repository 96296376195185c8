//! Completion reports over held-out sequences.

use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::error::Result;
use crate::io;
use crate::model::Token;
use crate::model::generator::{GenerationStatus, Generator};
use crate::model::ngram_model::NGramModel;
use crate::model::prediction::Prediction;

/// Completion of one held-out sequence.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CompletionRecord {
	pub prefix: Vec<Token>,
	pub predictions: Vec<Prediction>,
	pub stop: GenerationStatus,
}

/// Completions keyed by the sequence's index in the held-out set.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct CompletionReport {
	pub records: BTreeMap<usize, CompletionRecord>,
}

impl CompletionReport {
	/// Completes the first `config.sample_size` sequences of `sequences`.
	///
	/// Each sequence is cut after `config.seed_length` tokens and the model
	/// continues that prefix. Sequences with nothing left after the prefix,
	/// or with a prefix too short for the model, are skipped.
	pub fn build(model: &NGramModel, sequences: &[Vec<Token>], config: &ReportConfig) -> Result<Self> {
		config.validate()?;

		let mut records = BTreeMap::new();
		for (index, sequence) in sequences.iter().enumerate().take(config.sample_size) {
			if sequence.len() <= config.seed_length || config.seed_length < model.context_len() {
				warn!(
					"skipping sequence {index}: {} tokens for a prefix of {} ({}-gram model)",
					sequence.len(),
					config.seed_length,
					model.n()
				);
				continue;
			}

			let prefix = sequence[..config.seed_length].to_vec();
			let (predictions, stop) = Generator::new(model, &prefix, config.max_length)?.run();
			let predictions = match config.precision {
				Some(decimals) => predictions.iter().map(|p| p.rounded(decimals)).collect(),
				None => predictions,
			};
			records.insert(index, CompletionRecord { prefix, predictions, stop });
		}

		info!("completed {} of {} held-out sequences", records.len(), sequences.len());
		Ok(Self { records })
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Writes the report as pretty-printed JSON.
	pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		io::write_bytes(&path, self.to_json()?.as_bytes())?;
		info!("wrote completion report to {}", path.as_ref().display());
		Ok(())
	}
}

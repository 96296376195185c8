//! Error type shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = NgramError> = std::result::Result<T, E>;

/// Failures raised while training, evaluating, or generating.
///
/// A context missing from a model is not an error: lookups return `None`
/// and callers branch on it.
#[derive(Debug, Error)]
pub enum NgramError {
	/// A parameter or configuration value failed validation.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// Perplexity was requested over a corpus yielding no scorable token.
	#[error("evaluation set has no token to score for a {n}-gram model")]
	EmptyEvaluationSet { n: usize },

	/// Caller-provided data is structurally unusable (ex. a prefix too short).
	#[error("malformed input: {0}")]
	MalformedInput(String),

	/// Filesystem error with the offending path when known.
	#[error("io error while processing {path:?}: {source}")]
	Io {
		source: std::io::Error,
		path: Option<PathBuf>,
	},

	/// Model, report, or configuration (de)serialization failure.
	#[error("serialization error: {0}")]
	Serialization(String),
}

impl NgramError {
	/// Wraps an IO error together with the path being processed.
	pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
		Self::Io { source, path }
	}
}

impl From<postcard::Error> for NgramError {
	fn from(err: postcard::Error) -> Self {
		Self::Serialization(err.to_string())
	}
}

impl From<serde_json::Error> for NgramError {
	fn from(err: serde_json::Error) -> Self {
		Self::Serialization(err.to_string())
	}
}

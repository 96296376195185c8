//! N-gram language models for code completion.
//!
//! This crate learns token n-gram models from tokenized method bodies and
//! uses them to autocomplete partial token sequences:
//! - Frequency counting over sliding windows, parallelized across CPUs
//! - Maximum-likelihood estimation and perplexity scoring
//! - Search over a range of orders for the lowest held-out perplexity
//! - Generation with code-aware halting (bracket balance, repetition,
//!   alternating pairs)
//! - Corpus cleaning (ASCII-only, length outliers, getter/setter boilerplate)
//! - A C-family tokenizer, a seeded corpus splitter, persistence, and
//!   JSON completion reports around the core
//!
//! ```no_run
//! use rs_ngram_core::config::PipelineConfig;
//! use rs_ngram_core::corpus::{self, Dataset};
//! use rs_ngram_core::model::generator::continue_sequence;
//! use rs_ngram_core::model::selector::{Corpora, load_or_select};
//! use rs_ngram_core::preprocess::preprocess;
//! use rs_ngram_core::tokenizer::{CodeTokenizer, Tokenizer};
//!
//! # fn main() -> rs_ngram_core::Result<()> {
//! let config = PipelineConfig::default();
//! let fragments = corpus::load_fragments("data/methods.txt")?;
//! let fragments = preprocess(fragments, &config.preprocess)?;
//! let sequences = corpus::tokenize_all(&CodeTokenizer::new(), &fragments);
//! let dataset = Dataset::split(sequences, &config.split)?;
//! let corpora = Corpora { train: &dataset.train, test: &dataset.test, validation: &dataset.validation };
//! let selection = load_or_select("data/methods.bin", corpora, &config.selection)?;
//!
//! let prefix = CodeTokenizer::for_prefix().tokenize("public int size ( ) {");
//! for prediction in continue_sequence(&selection.model, &prefix, 10)? {
//!     println!("{} {:.3}", prediction.token, prediction.probability);
//! }
//! # Ok(())
//! # }
//! ```

/// Preprocessing, search, split, and report settings.
pub mod config;

/// Corpus loading and seeded train/validation/test partitioning.
pub mod corpus;

/// Crate error type.
pub mod error;

/// I/O utilities (file loading, path helpers).
pub mod io;

/// N-gram models, perplexity, model search, and generation.
pub mod model;

/// Fragment filters run before tokenization.
pub mod preprocess;

/// JSON completion reports over held-out sequences.
pub mod report;

/// Source code tokenization.
pub mod tokenizer;

pub use error::{NgramError, Result};

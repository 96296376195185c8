use rs_ngram_core::config::{PipelineConfig, ReportConfig, SelectionConfig, SplitConfig};
use rs_ngram_core::corpus::{self, Dataset};
use rs_ngram_core::model::generator::{GenerationStatus, Generator, continue_sequence};
use rs_ngram_core::model::ngram_model::NGramModel;
use rs_ngram_core::model::perplexity::perplexity;
use rs_ngram_core::model::selector::{Corpora, load_or_select, select_best};
use rs_ngram_core::report::CompletionReport;
use rs_ngram_core::tokenizer::{CodeTokenizer, Tokenizer};

const METHODS: &[&str] = &[
	"public int getCount() { return count; }",
	"public void setCount(int count) { this.count = count; }",
	"public boolean isEmpty() { return size == 0; }",
	"public int size() { return size; }",
	"public void clear() { size = 0; count = 0; }",
	"public String getName() { return name; }",
	"public void setName(String name) { this.name = name; }",
	"public boolean hasNext() { return index < size; }",
	"public int next() { return items[index++]; }",
	"public void reset() { index = 0; }",
	"public int first() { return items[0]; }",
	"public void add(int item) { items[size++] = item; }",
	"public boolean contains(int item) { for (int i = 0; i < size; i++) { if (items[i] == item) { return true; } } return false; }",
	"public int indexOf(int item) { for (int i = 0; i < size; i++) { if (items[i] == item) { return i; } } return -1; }",
	"public void remove(int index) { for (int i = index; i < size - 1; i++) { items[i] = items[i + 1]; } size--; }",
	"public int sum() { int total = 0; for (int i = 0; i < size; i++) { total += items[i]; } return total; }",
	"public int max() { int best = items[0]; for (int i = 1; i < size; i++) { if (items[i] > best) { best = items[i]; } } return best; }",
	"public int min() { int best = items[0]; for (int i = 1; i < size; i++) { if (items[i] < best) { best = items[i]; } } return best; }",
	"public String toString() { return name + count; }",
	"public int hashCode() { return count * 31 + size; }",
];

fn sequences() -> Vec<Vec<String>> {
	let fragments: Vec<String> = METHODS.iter().map(|m| (*m).to_owned()).collect();
	corpus::tokenize_all(&CodeTokenizer::new(), &fragments)
}

fn dataset() -> Dataset {
	let split = SplitConfig { test_ratio: 0.2, validation_ratio: 0.25, seed: 7 };
	Dataset::split(sequences(), &split).unwrap()
}

#[test]
fn search_then_complete() {
	let dataset = dataset();
	let corpora = Corpora { train: &dataset.train, test: &dataset.test, validation: &dataset.validation };
	let selection = select_best(corpora, &SelectionConfig { min_n: 2, max_n: 5 }).unwrap();

	assert_eq!(selection.candidates.len(), 4);
	assert!((2..=5).contains(&selection.n));
	assert!(selection.validation_perplexity >= 1.0);

	let prefix = CodeTokenizer::for_prefix().tokenize("public int size ( ) { return");
	if prefix.len() >= selection.model.context_len() {
		let predictions = continue_sequence(&selection.model, &prefix, 15).unwrap();
		assert!(predictions.len() <= 15);
		assert!(predictions.iter().all(|p| p.probability > 0.0 && p.probability <= 1.0));
	}
}

#[test]
fn training_corpus_beats_held_out_corpus() {
	let all = sequences();
	let (train, held_out) = corpus::split(all, 0.3, 3).unwrap();
	let model = NGramModel::train(&train, 3).unwrap();
	let own = perplexity(&train, &model).unwrap();
	let unseen = perplexity(&held_out, &model).unwrap();
	assert!(own >= 1.0);
	assert!(own <= unseen);
}

#[test]
fn persisted_model_scores_identically() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("methods.bin");
	let dataset = dataset();

	let model = NGramModel::train(&dataset.train, 3).unwrap();
	let before = perplexity(&dataset.test, &model).unwrap();
	model.save(&path).unwrap();
	let reloaded = NGramModel::load(&path).unwrap();
	let after = perplexity(&dataset.test, &reloaded).unwrap();

	assert_eq!(before, after);
	assert_eq!(reloaded.n(), 3);
}

#[test]
fn load_or_select_skips_the_search_once_persisted() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("best.bin");
	let dataset = dataset();
	let corpora = Corpora { train: &dataset.train, test: &dataset.test, validation: &dataset.validation };
	let config = PipelineConfig::default();

	let first = load_or_select(&path, corpora, &config.selection).unwrap();
	let second = load_or_select(&path, corpora, &config.selection).unwrap();
	assert!(second.candidates.is_empty());
	assert_eq!(first.n, second.n);
	assert_eq!(first.validation_perplexity, second.validation_perplexity);
}

#[test]
fn generator_can_be_driven_step_by_step() {
	let model = NGramModel::train(&sequences(), 3).unwrap();
	let prefix = CodeTokenizer::for_prefix().tokenize("public void");
	let mut generator = Generator::new(&model, &prefix, 30).unwrap();
	let first = generator.next();
	assert!(first.is_some());
	let rest: Vec<_> = generator.by_ref().collect();
	assert!(rest.len() < 30);
	assert!(generator.status().is_finished());
	assert_ne!(generator.status(), GenerationStatus::Generating);
}

#[test]
fn report_over_test_split() {
	let dataset = dataset();
	let model = NGramModel::train(&dataset.train, 3).unwrap();
	let config = ReportConfig { sample_size: 10, seed_length: 4, max_length: 8, precision: Some(3) };
	let report = CompletionReport::build(&model, &dataset.test, &config).unwrap();
	assert_eq!(report.len(), dataset.test.len().min(10));
	for record in report.records.values() {
		assert_eq!(record.prefix.len(), 4);
		assert!(record.predictions.len() <= 8);
	}
}

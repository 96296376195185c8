use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::info;

use rs_ngram_core::config::{PipelineConfig, PreprocessConfig};
use rs_ngram_core::corpus::{self, Dataset};
use rs_ngram_core::io::build_output_path;
use rs_ngram_core::model::generator::Generator;
use rs_ngram_core::model::ngram_model::NGramModel;
use rs_ngram_core::model::perplexity::perplexity;
use rs_ngram_core::model::selector::{Corpora, load_or_select};
use rs_ngram_core::preprocess::preprocess;
use rs_ngram_core::report::CompletionReport;
use rs_ngram_core::tokenizer::{CodeTokenizer, Tokenizer};

#[derive(Parser, Debug)]
#[command(author, version, about = "N-gram code completion toolkit", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the best n-gram order on a corpus and report completions
    Train(TrainArgs),
    /// Continue a code fragment with a trained model
    Complete(CompleteArgs),
    /// Compute the perplexity of a trained model on a corpus
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Corpus file, one code fragment per line
    corpus: PathBuf,

    /// Model file (defaults to the corpus path with a .bin extension)
    #[arg(short, long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Smallest n tried
    #[arg(long, value_name = "N")]
    min_n: Option<usize>,

    /// Largest n tried
    #[arg(long, value_name = "N")]
    max_n: Option<usize>,

    /// Seed of the train/validation/test split
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the JSON completion report for the test split
    #[arg(short, long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Retrain even if the model file already exists
    #[arg(long)]
    force: bool,

    /// Skip the ASCII, length, and getter/setter filters
    #[arg(long)]
    raw: bool,
}

#[derive(Args, Debug)]
struct CompleteArgs {
    /// Trained model file
    #[arg(short, long, value_name = "PATH")]
    model: PathBuf,

    /// Maximum number of predicted tokens
    #[arg(long, default_value_t = 20)]
    max_length: usize,

    /// Code fragment to continue
    #[arg(required = true)]
    code: Vec<String>,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long, value_name = "PATH")]
    model: PathBuf,

    /// Corpus file, one code fragment per line
    corpus: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Train(args) => train(args),
        Commands::Complete(args) => complete(args),
        Commands::Evaluate(args) => evaluate(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    let level = match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => "off",
        -1 => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(args: &TrainArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(min_n) = args.min_n {
        config.selection.min_n = min_n;
    }
    if let Some(max_n) = args.max_n {
        config.selection.max_n = max_n;
    }
    if let Some(seed) = args.seed {
        config.split.seed = seed;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn load_sequences(path: &Path, filters: Option<&PreprocessConfig>) -> Result<Vec<Vec<String>>> {
    let mut fragments = corpus::load_fragments(path)
        .with_context(|| format!("failed to load corpus {}", path.display()))?;
    if let Some(filters) = filters {
        fragments = preprocess(fragments, filters).context("preprocessing failed")?;
    }
    if fragments.is_empty() {
        bail!("corpus {} has no code fragment", path.display());
    }
    Ok(corpus::tokenize_all(&CodeTokenizer::new(), &fragments))
}

fn train(args: TrainArgs) -> Result<()> {
    let config = load_config(&args)?;
    let model_path = match &args.model {
        Some(path) => path.clone(),
        None => build_output_path(&args.corpus, "bin")?,
    };

    let filters = (!args.raw).then_some(&config.preprocess);
    let dataset = Dataset::split(load_sequences(&args.corpus, filters)?, &config.split)?;
    let corpora = Corpora {
        train: &dataset.train,
        test: &dataset.test,
        validation: &dataset.validation,
    };

    if args.force && model_path.exists() {
        std::fs::remove_file(&model_path)
            .with_context(|| format!("failed to remove {}", model_path.display()))?;
    }
    let selection = load_or_select(&model_path, corpora, &config.selection)
        .context("model selection failed")?;

    for (n, score) in &selection.candidates {
        println!("{n}-gram\ttest perplexity\t{score:.4}");
    }
    println!(
        "best\t{}-gram\tvalidation perplexity\t{:.4}",
        selection.n, selection.validation_perplexity
    );

    if let Some(report_path) = &args.report {
        let report = CompletionReport::build(&selection.model, &dataset.test, &config.report)?;
        report
            .write_json(report_path)
            .with_context(|| format!("failed to write report {}", report_path.display()))?;
    }

    info!("model stored at {}", model_path.display());
    Ok(())
}

fn complete(args: CompleteArgs) -> Result<()> {
    let model = NGramModel::load(&args.model)
        .with_context(|| format!("failed to load model {}", args.model.display()))?;
    let prefix = CodeTokenizer::for_prefix().tokenize(&args.code.join(" "));

    let generator = Generator::new(&model, &prefix, args.max_length)?;
    let (predictions, status) = generator.run();
    for prediction in &predictions {
        println!("{}\t{:.4}", prediction.token, prediction.probability);
    }
    info!("generation ended with {status:?}");
    Ok(())
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    let model = NGramModel::load(&args.model)
        .with_context(|| format!("failed to load model {}", args.model.display()))?;
    let sequences = load_sequences(&args.corpus, None)?;
    let score = perplexity(&sequences, &model)?;
    println!("{score:.4}");
    Ok(())
}

//! Lexmetric Stylometry Pipeline
//!
//! Extracts stylometric features from a JSON corpus and saves per-text
//! results alongside a corpus summary.

use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;

use lexmetric::analyze::{analyze_corpus, CorpusAnalyzer};
use lexmetric::config::{load_config, AnalysisConfig};
use lexmetric::ingest::load_corpus;
use lexmetric::lexical::{
    flesch_kincaid_grade, function_word_frequency, legomena_ratios, moving_average_ttr,
    sentences, type_token_ratio, word_length_stats,
};
use lexmetric::models::CorpusSummary;
use lexmetric::output::{print_features, print_summary, save_run};
use lexmetric::resources::NlpResources;
use lexmetric::sentiment::{classify_text, LexiconClassifier};

#[derive(Parser)]
#[command(name = "lexmetric")]
#[command(about = "Stylometric feature extraction for comparative authorship analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors and hide progress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full analysis described by a TOML config
    Analyze {
        /// Path to the experiment config
        #[arg(long)]
        config: PathBuf,

        /// Print the summary without writing a run directory
        #[arg(long)]
        no_save: bool,
    },

    /// Extract texts from a JSON corpus without analyzing them
    Texts {
        /// Path to the JSON corpus
        #[arg(long)]
        data: PathBuf,

        /// Field holding the text in each object
        #[arg(long, default_value = "answer")]
        key: String,

        /// Number of texts to preview
        #[arg(long, default_value = "3")]
        preview: usize,
    },

    /// Print every feature for a single text
    Inspect {
        /// Text to analyze
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(long)]
        file: Option<PathBuf>,

        /// MATTR window size
        #[arg(long, default_value = "100")]
        window: usize,
    },

    /// Benchmark feature extraction
    Benchmark {
        /// Number of iterations per extractor
        #[arg(long, default_value = "1000")]
        iterations: usize,

        /// Tokens per synthetic text
        #[arg(long, default_value = "500")]
        size: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    match cli.command {
        Commands::Analyze { config, no_save } => {
            let config = load_config(&config)?;
            let texts = load_corpus(&config.data.data_path, &config.data.target_key)?;

            let resources = NlpResources::english();
            let classifier = LexiconClassifier::new();
            let metrics = analyze_corpus(&texts, &config, &resources, &classifier, !cli.quiet)?;

            if !no_save {
                let run_dir = save_run(&config, &metrics, &texts)?;
                if !cli.quiet {
                    eprintln!("Output: {}", run_dir.display());
                }
            }

            if !cli.quiet {
                print_summary(&config, &CorpusSummary::from_metrics(&metrics));
            }
        }

        Commands::Texts { data, key, preview } => {
            let texts = load_corpus(&data, &key)?;

            println!("=== Corpus ===");
            println!("File: {}", data.display());
            println!("Key: {}", key);
            println!("Texts: {}", texts.len());

            if preview > 0 {
                println!("\n=== Preview ===");
                for (i, text) in texts.iter().take(preview).enumerate() {
                    println!("  [{}] {}", i, truncate(text, 80));
                }
            }
        }

        Commands::Inspect { text, file, window } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => return Err("Provide --text or --file".into()),
            };

            let mut config = AnalysisConfig::new("inspect", "");
            config.lexical.richness.window = window;
            config.validate_metrics()?;

            let resources = NlpResources::english();
            let classifier = LexiconClassifier::new();
            let analyzer = CorpusAnalyzer::new(&config, &resources, &classifier);
            let features = analyzer.analyze_text(0, &text)?;

            print_features(&features)?;
        }

        Commands::Benchmark { iterations, size } => {
            run_benchmark(iterations, size)?;
        }
    }

    Ok(())
}

/// Shorten `text` to at most `max` characters, marking the cut.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Time each extractor and a full per-text analysis.
fn run_benchmark(iterations: usize, size: usize) -> Result<(), Box<dyn std::error::Error>> {
    use std::time::Instant;

    println!("=== Extraction Benchmark ===");
    println!("Iterations: {}", iterations);
    println!("Tokens per text: {}", size);

    let resources = NlpResources::english();
    let classifier = LexiconClassifier::new();
    let config = AnalysisConfig::new("benchmark", "");
    // Every fourth word a stop word, the rest cycling through 97 distinct words
    let text = (0..size)
        .map(|i| {
            if i % 4 == 0 {
                "the".to_string()
            } else {
                format!("word{}", i % 97)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let tokens = resources.tokenize(&text);

    let report = |label: &str, elapsed: std::time::Duration| {
        let per_call = elapsed.as_secs_f64() / iterations.max(1) as f64;
        println!("\n{}:", label);
        println!("  Total time: {:.3}s", elapsed.as_secs_f64());
        println!("  Per call: {:.3}us", per_call * 1e6);
    };

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = resources.tokenize(&text);
    }
    report("Tokenize", start.elapsed());

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = word_length_stats(&tokens);
        let _ = function_word_frequency(&tokens, resources.stop_words());
    }
    report("Word length + function words", start.elapsed());

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = type_token_ratio(&tokens);
        let _ = moving_average_ttr(&tokens, config.lexical.richness.window);
    }
    report("TTR + MATTR", start.elapsed());

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = legomena_ratios(&tokens);
    }
    report("Legomena", start.elapsed());

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = flesch_kincaid_grade(sentences(&text).len(), &tokens);
    }
    report("Sentences + readability", start.elapsed());

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = classify_text(&classifier, &text)?;
    }
    report("Sentiment", start.elapsed());

    let analyzer = CorpusAnalyzer::new(&config, &resources, &classifier);
    let start = Instant::now();
    for i in 0..iterations {
        let _ = analyzer.analyze_text(i, &text)?;
    }
    report("Full text analysis", start.elapsed());

    Ok(())
}

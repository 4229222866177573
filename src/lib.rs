//! Lexmetric Stylometry Library
//!
//! Extracts per-text stylometric features (word-length moments, function-word
//! frequency, type-token ratios, legomena ratios, emotion scores, sentence
//! and paragraph lengths, readability and part-of-speech shares) and
//! aggregates them across a corpus into parallel columns for comparative
//! authorship analysis.
//!
//! # Example
//!
//! ```no_run
//! use lexmetric::prelude::*;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("experiment.toml")).unwrap();
//! let texts = load_corpus(&config.data.data_path, &config.data.target_key).unwrap();
//!
//! let resources = NlpResources::english();
//! let classifier = LexiconClassifier::new();
//! let metrics = analyze_corpus(&texts, &config, &resources, &classifier, true).unwrap();
//!
//! println!("Analyzed {} texts", metrics.text_count());
//! let run_dir = save_run(&config, &metrics, &texts).unwrap();
//! println!("Saved to {}", run_dir.display());
//! ```
//!
//! # Single Text Example
//!
//! ```
//! use lexmetric::prelude::*;
//!
//! let resources = NlpResources::english();
//! let tokens = resources.tokenize("The cat sat on the mat");
//!
//! assert_eq!(tokens.len(), 6);
//! assert!((type_token_ratio(&tokens) - 5.0 / 6.0).abs() < 1e-12);
//! ```

pub mod analyze;
pub mod config;
pub mod ingest;
pub mod lexical;
pub mod models;
pub mod output;
pub mod resources;
pub mod sentiment;
pub mod tokenize;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analyze::{
        analyze_corpus, verify_parallel, AnalysisError, CorpusAnalyzer, Extractor, RunState,
        EXTRACTION_ORDER,
    };
    pub use crate::config::{
        load_config, validate_data_path, AnalysisConfig, ConfigError, DataConfig, LegomenaConfig,
        LexicalConfig, RichnessConfig, SyntacticConfig,
    };
    pub use crate::ingest::{extract_texts, extract_texts_from_str, load_corpus, IngestError};
    pub use crate::lexical::{
        count_syllables, flesch_kincaid_grade, frequency_counts, function_word_frequency,
        legomena_ratios, moments, moving_average_ttr, paragraph_length_stats, paragraphs,
        pos_frequency, sentence_length_stats, sentences, type_token_ratio, word_length_stats,
        word_lengths, DEFAULT_MATTR_WINDOW,
    };
    pub use crate::models::{
        CorpusSummary, Emotion, EmotionScores, LegomenaRatios, LexicalMetrics, MetricSummary,
        ParagraphLengthStats, SentenceLengthStats, TextFeatures, WordLengthStats,
    };
    pub use crate::output::{
        format_summary, print_features, print_summary, save_run, write_csv, write_csv_file,
        write_json, write_json_file, OutputError, RunMetadata,
    };
    pub use crate::resources::NlpResources;
    pub use crate::sentiment::{
        classify_text, validate_probabilities, EmotionClassifier, LexiconClassifier,
        SentimentError,
    };
    pub use crate::tokenize::{LexiconTagger, PosTagger, Tokenizer, WordTokenizer};
}

// Re-export commonly used types at the crate root
pub use analyze::{analyze_corpus, CorpusAnalyzer};
pub use config::AnalysisConfig;
pub use models::{LexicalMetrics, TextFeatures};

//! Integration tests for lexmetric.
//!
//! These tests verify the end-to-end behavior of the stylometry pipeline:
//! config and corpus loading, per-corpus analysis, and run persistence.

use lexmetric::analyze::{analyze_corpus, AnalysisError, CorpusAnalyzer, RunState};
use lexmetric::config::{load_config, AnalysisConfig, ConfigError};
use lexmetric::ingest::{load_corpus, IngestError};
use lexmetric::lexical::{legomena_ratios, moving_average_ttr, type_token_ratio};
use lexmetric::models::{CorpusSummary, LexicalMetrics, SCALAR_COLUMNS};
use lexmetric::output::{save_run, RunMetadata};
use lexmetric::resources::NlpResources;
use lexmetric::sentiment::{EmotionClassifier, LexiconClassifier, SentimentError};
use proptest::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const SPEECHES: &str = r#"[
    {"question": "Q1", "answer": "We are gathered here today because we believe in a better future."},
    {"question": "Q2", "answer": "Fear and anger will not divide this nation. We are proud and hopeful."},
    {"question": "Q3"},
    {"question": "Q4", "answer": "The work continues, and the work is hard, but the work is ours."}
]"#;

/// Classifier that fails on any text containing a marker word.
struct MarkerFailClassifier;

impl EmotionClassifier for MarkerFailClassifier {
    fn classify(&self, text: &str) -> Result<Vec<f64>, SentimentError> {
        if text.contains("BROKEN") {
            return Err(SentimentError::Classifier("backend offline".to_string()));
        }
        Ok(vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0])
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Helper to lay out a corpus file and config file in a scratch directory.
fn write_experiment(dir: &Path, corpus: &str, extra_toml: &str) -> std::path::PathBuf {
    let data_path = dir.join("speeches.json");
    std::fs::write(&data_path, corpus).unwrap();

    let config_path = dir.join("experiment.toml");
    let toml = format!(
        r#"experiment_name = "Integration Run"
description = "end to end"
{extra}
[data]
data_path = '{data}'
target_key = "answer"
output_path = '{out}'
"#,
        extra = extra_toml,
        data = data_path.display(),
        out = dir.join("output").display(),
    );
    std::fs::write(&config_path, toml).unwrap();
    config_path
}

fn only_function_words() -> AnalysisConfig {
    let mut config = AnalysisConfig::new("scenario", "unused.json");
    config.lexical.word_length = false;
    config.lexical.sentiment = false;
    config.lexical.richness.ttr = false;
    config.lexical.richness.mattr = false;
    config.lexical.legomena.hapax = false;
    config.lexical.legomena.dislegomena = false;
    config.lexical.legomena.trilegomina = false;
    config.lexical.readability = false;
    config.syntactic.pos_frequency = false;
    config.syntactic.sentence_length = false;
    config.syntactic.paragraph_length = false;
    config
}

#[test]
fn test_full_pipeline_from_files() {
    let dir = TempDir::new().unwrap();
    let config_path = write_experiment(dir.path(), SPEECHES, "");

    let config = load_config(&config_path).unwrap();
    let texts = load_corpus(&config.data.data_path, &config.data.target_key).unwrap();
    assert_eq!(texts.len(), 3);

    let resources = NlpResources::english();
    let classifier = LexiconClassifier::new();
    let metrics = analyze_corpus(&texts, &config, &resources, &classifier, false).unwrap();

    assert_eq!(metrics.text_count(), 3);
    for (name, values) in metrics.scalar_columns() {
        assert_eq!(values.len(), 3, "column {} not parallel", name);
    }
    assert_eq!(metrics.syntactic.pos_frequency.len(), 3);

    for i in 0..3 {
        let total: f64 = [
            metrics.sentiment.anger[i],
            metrics.sentiment.disgust[i],
            metrics.sentiment.fear[i],
            metrics.sentiment.joy[i],
            metrics.sentiment.neutral[i],
            metrics.sentiment.sadness[i],
            metrics.sentiment.surprise[i],
        ]
        .iter()
        .sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&metrics.richness.ttr[i]));
        assert!((0.0..=1.0).contains(&metrics.function_word_frequency[i]));
    }

    // "the work" repeats three times in the last text
    assert!(metrics.richness.ttr[2] < metrics.richness.ttr[0]);
    assert!(metrics.legomena.trilegomina[2] > 0.0);

    let run_dir = save_run(&config, &metrics, &texts).unwrap();
    assert!(run_dir.starts_with(dir.path().join("output")));

    let metadata: RunMetadata =
        serde_json::from_str(&std::fs::read_to_string(run_dir.join("metadata.json")).unwrap())
            .unwrap();
    assert_eq!(metadata.text_count, 3);
    assert_eq!(metadata.description.as_deref(), Some("end to end"));
    assert_eq!(metadata.summary.metrics.len(), SCALAR_COLUMNS.len());

    let reloaded: LexicalMetrics =
        serde_json::from_str(&std::fs::read_to_string(run_dir.join("results.json")).unwrap())
            .unwrap();
    assert_eq!(reloaded, metrics);

    let csv = std::fs::read_to_string(run_dir.join("results.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn test_disabled_metrics_stay_empty() {
    let dir = TempDir::new().unwrap();
    let config_path = write_experiment(
        dir.path(),
        SPEECHES,
        r#"
[lexical]
sentiment = false
readability = false

[lexical.richness]
mattr = false

[lexical.legomena]
dislegomena = false

[syntactic]
pos_frequency = false
paragraph_length = false
"#,
    );

    let config = load_config(&config_path).unwrap();
    let texts = load_corpus(&config.data.data_path, &config.data.target_key).unwrap();
    let metrics = analyze_corpus(
        &texts,
        &config,
        &NlpResources::english(),
        &LexiconClassifier::new(),
        false,
    )
    .unwrap();

    assert_eq!(metrics.richness.ttr.len(), 3);
    assert!(metrics.richness.mattr.is_empty());
    assert_eq!(metrics.legomena.hapax.len(), 3);
    assert!(metrics.legomena.dislegomena.is_empty());
    assert_eq!(metrics.legomena.trilegomina.len(), 3);
    assert!(metrics.sentiment.joy.is_empty());
    assert!(metrics.syntactic.pos_frequency.is_empty());
    assert!(metrics.syntactic.paragraph_length.mean.is_empty());
    assert!(metrics.readability.flesch_kincaid.is_empty());
    assert_eq!(metrics.syntactic.sentence_length.avg.len(), 3);
    assert_eq!(metrics.word_length.avg.len(), 3);

    let summary = CorpusSummary::from_metrics(&metrics);
    assert!(summary.get("richness.mattr").is_none());
    assert!(summary.get("richness.ttr").is_some());
}

#[test]
fn test_function_word_scenario() {
    let config = only_function_words();
    let resources = NlpResources::with_stop_words(["the", "on"]);
    let classifier = LexiconClassifier::new();

    let metrics = analyze_corpus(
        &["the cat sat", "the cat sat on the mat"],
        &config,
        &resources,
        &classifier,
        false,
    )
    .unwrap();

    assert_eq!(metrics.function_word_frequency.len(), 2);
    assert!(approx(metrics.function_word_frequency[0], 1.0 / 3.0));
    assert!(approx(metrics.function_word_frequency[1], 0.5));
    assert!(metrics.word_length.avg.is_empty());
    assert!(metrics.richness.ttr.is_empty());
}

#[test]
fn test_empty_and_punctuation_texts_yield_zeros() {
    let config = AnalysisConfig::new("empty", "unused.json");
    let metrics = analyze_corpus(
        &["", "!!! ... ???"],
        &config,
        &NlpResources::english(),
        &LexiconClassifier::new(),
        false,
    )
    .unwrap();

    for (name, values) in metrics.scalar_columns() {
        assert_eq!(values.len(), 2, "column {}", name);
        if !name.starts_with("sentiment.") {
            assert_eq!(values, &[0.0, 0.0], "column {}", name);
        }
    }
    assert_eq!(metrics.sentiment.neutral, vec![1.0, 1.0]);
    assert!(metrics.syntactic.pos_frequency.iter().all(|m| m.is_empty()));
}

#[test]
fn test_sentence_and_paragraph_columns_from_file() {
    let corpus = r#"[
        {"answer": "One short line."},
        {"answer": "First paragraph here. It has two sentences.\n\nSecond paragraph.\n\nThird one is a little bit longer."}
    ]"#;
    let dir = TempDir::new().unwrap();
    let config_path = write_experiment(dir.path(), corpus, "");

    let config = load_config(&config_path).unwrap();
    let texts = load_corpus(&config.data.data_path, &config.data.target_key).unwrap();
    let metrics = analyze_corpus(
        &texts,
        &config,
        &NlpResources::english(),
        &LexiconClassifier::new(),
        false,
    )
    .unwrap();

    let sentence = &metrics.syntactic.sentence_length;
    assert_eq!(sentence.avg, vec![3.0, 16.0 / 4.0]);
    assert_eq!(sentence.variance[0], 0.0);
    assert!(sentence.variance[1] > 0.0);

    // Paragraph token counts: [3] and [7, 2, 7]
    let paragraph = &metrics.syntactic.paragraph_length;
    assert_eq!(paragraph.mean, vec![3.0, 16.0 / 3.0]);
    assert_eq!(paragraph.max, vec![3.0, 7.0]);
    assert_eq!(paragraph.min, vec![3.0, 2.0]);
    assert_eq!(paragraph.variance[0], 0.0);

    assert_eq!(metrics.readability.flesch_kincaid.len(), 2);
    assert!(metrics.readability.flesch_kincaid.iter().all(|g| g.is_finite()));

    let summary = CorpusSummary::from_metrics(&metrics);
    let max = summary.get("syntactic.paragraph_length.max").unwrap();
    assert_eq!(max.max, 7.0);
    assert_eq!(max.min, 3.0);
}

#[test]
fn test_missing_key_corpus_rejected_before_analysis() {
    let dir = TempDir::new().unwrap();
    let config_path = write_experiment(dir.path(), r#"[{"q": "x"}]"#, "");

    let config = load_config(&config_path).unwrap();
    let err = load_corpus(&config.data.data_path, &config.data.target_key).unwrap_err();
    assert!(matches!(err, IngestError::NoTexts { .. }));
}

#[test]
fn test_config_rejects_missing_data_file() {
    let dir = TempDir::new().unwrap();
    let config_path = write_experiment(dir.path(), "[]", "");
    std::fs::remove_file(dir.path().join("speeches.json")).unwrap();

    let err = load_config(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::DataPathMissing(_)));
}

#[test]
fn test_ingestion_errors_propagate() {
    let dir = TempDir::new().unwrap();

    let config_path = write_experiment(dir.path(), r#"{"answer": "not a list"}"#, "");
    let config = load_config(&config_path).unwrap();
    assert!(matches!(
        load_corpus(&config.data.data_path, "answer"),
        Err(IngestError::NotAList(_))
    ));

    std::fs::write(&config.data.data_path, "[]").unwrap();
    assert!(matches!(
        load_corpus(&config.data.data_path, "answer"),
        Err(IngestError::EmptyList)
    ));

    std::fs::write(&config.data.data_path, "[{").unwrap();
    assert!(matches!(
        load_corpus(&config.data.data_path, "answer"),
        Err(IngestError::InvalidJson(_))
    ));
}

#[test]
fn test_classifier_failure_fails_run() {
    let config = AnalysisConfig::new("failure", "unused.json");
    let resources = NlpResources::english();
    let classifier = MarkerFailClassifier;
    let texts = ["first text is fine", "second text is BROKEN", "third never runs"];

    let mut analyzer = CorpusAnalyzer::new(&config, &resources, &classifier);
    let err = analyzer.run(&texts).unwrap_err();

    assert!(matches!(err, AnalysisError::Sentiment { index: 1, .. }));
    assert_eq!(analyzer.state(), RunState::Failed { index: 1 });
    assert_eq!(analyzer.processed(), 1);

    let partial = analyzer.partial_metrics();
    assert_eq!(partial.function_word_frequency.len(), 1);
    assert_eq!(partial.sentiment.neutral, vec![1.0]);

    assert!(matches!(
        analyzer.run(&texts),
        Err(AnalysisError::AlreadyFailed { index: 1 })
    ));
    assert!(matches!(
        analyzer.into_metrics(),
        Err(AnalysisError::RunFailed { index: 1 })
    ));
}

#[test]
fn test_results_are_reproducible() {
    let config = AnalysisConfig::new("repro", "unused.json");
    let resources = NlpResources::english();
    let classifier = LexiconClassifier::new();
    let texts: Vec<String> = serde_json::from_str::<Vec<serde_json::Value>>(SPEECHES)
        .unwrap()
        .into_iter()
        .filter_map(|v| v.get("answer").and_then(|a| a.as_str()).map(String::from))
        .collect();

    let first = analyze_corpus(&texts, &config, &resources, &classifier, false).unwrap();
    let second = analyze_corpus(&texts, &config, &resources, &classifier, false).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_order_follows_corpus() {
    let config = only_function_words();
    let resources = NlpResources::with_stop_words(["a"]);
    let classifier = LexiconClassifier::new();

    let forward = analyze_corpus(&["a b", "a a a b"], &config, &resources, &classifier, false)
        .unwrap();
    let reverse = analyze_corpus(&["a a a b", "a b"], &config, &resources, &classifier, false)
        .unwrap();

    assert_eq!(forward.function_word_frequency, vec![0.5, 0.75]);
    assert_eq!(reverse.function_word_frequency, vec![0.75, 0.5]);
}

fn token_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,2}", 0..250)
}

proptest! {
    #[test]
    fn legomena_counts_never_exceed_tokens(tokens in token_strategy()) {
        let r = legomena_ratios(&tokens);
        prop_assert!(r.hapax + 2.0 * r.dislegomena + 3.0 * r.trilegomina <= 1.0 + 1e-9);
        prop_assert!(r.hapax >= 0.0 && r.dislegomena >= 0.0 && r.trilegomina >= 0.0);
    }

    #[test]
    fn mattr_equals_ttr_below_window(tokens in token_strategy(), extra in 1usize..50) {
        let window = tokens.len() + extra;
        prop_assert_eq!(moving_average_ttr(&tokens, window), type_token_ratio(&tokens));
    }

    #[test]
    fn mattr_stays_in_unit_interval(tokens in token_strategy(), window in 1usize..120) {
        let m = moving_average_ttr(&tokens, window);
        prop_assert!((0.0..=1.0).contains(&m));
    }

    #[test]
    fn distinct_tokens_are_all_hapax(words in prop::collection::hash_set("[a-z]{1,8}", 1..80)) {
        let tokens: Vec<String> = words.into_iter().collect();
        let r = legomena_ratios(&tokens);
        prop_assert_eq!(type_token_ratio(&tokens), 1.0);
        prop_assert_eq!(r.hapax, 1.0);
        prop_assert_eq!(r.dislegomena, 0.0);
        prop_assert_eq!(r.trilegomina, 0.0);
    }

    #[test]
    fn every_enabled_column_is_parallel(texts in prop::collection::vec("[a-f ]{0,40}", 1..12)) {
        let config = AnalysisConfig::new("prop", "unused.json");
        let metrics = analyze_corpus(
            &texts,
            &config,
            &NlpResources::english(),
            &LexiconClassifier::new(),
            false,
        )
        .unwrap();

        for (name, values) in metrics.scalar_columns() {
            prop_assert_eq!(values.len(), texts.len(), "column {}", name);
        }
        prop_assert_eq!(metrics.syntactic.pos_frequency.len(), texts.len());
    }
}

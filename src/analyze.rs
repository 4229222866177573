//! Corpus analysis orchestration.
//!
//! This module drives per-text extraction across a corpus: tokenizing each
//! text, running the extractors enabled by the configuration in a fixed
//! order, and collecting one [`TextFeatures`] row per text.

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use crate::config::AnalysisConfig;
use crate::lexical::{
    flesch_kincaid_grade, function_word_frequency, legomena_ratios, moving_average_ttr,
    paragraph_length_stats, paragraphs, pos_frequency, sentence_length_stats, sentences,
    type_token_ratio, word_length_stats,
};
use crate::models::{LexicalMetrics, TextFeatures, POS_FREQUENCY, SCALAR_COLUMNS};
use crate::resources::NlpResources;
use crate::sentiment::{classify_text, EmotionClassifier, SentimentError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Corpus is empty; nothing to analyze")]
    EmptyCorpus,
    #[error("Sentiment extraction failed for text {index}: {source}")]
    Sentiment {
        index: usize,
        #[source]
        source: SentimentError,
    },
    #[error("Text {index} produced columns {actual:?}, expected {expected:?}")]
    RowMismatch {
        index: usize,
        expected: Vec<&'static str>,
        actual: Vec<&'static str>,
    },
    #[error("Column {column} has {actual} entries, expected {expected}")]
    Misaligned {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Run failed at text {index}; results are not valid for comparison")]
    RunFailed { index: usize },
    #[error("Analyzer already failed at text {index}; start a new analyzer")]
    AlreadyFailed { index: usize },
}

/// Lifecycle of a [`CorpusAnalyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running { index: usize, total: usize },
    Failed { index: usize },
}

/// One feature family, paired with the switch that enables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    FunctionWords,
    WordLength,
    Richness,
    Legomena,
    Sentiment,
    SentenceLength,
    ParagraphLength,
    Readability,
    PosFrequency,
}

/// Extractors in the order they run for every text.
pub const EXTRACTION_ORDER: [Extractor; 9] = [
    Extractor::FunctionWords,
    Extractor::WordLength,
    Extractor::Richness,
    Extractor::Legomena,
    Extractor::Sentiment,
    Extractor::SentenceLength,
    Extractor::ParagraphLength,
    Extractor::Readability,
    Extractor::PosFrequency,
];

impl Extractor {
    pub fn name(self) -> &'static str {
        match self {
            Extractor::FunctionWords => "function_words",
            Extractor::WordLength => "word_length",
            Extractor::Richness => "richness",
            Extractor::Legomena => "legomena",
            Extractor::Sentiment => "sentiment",
            Extractor::SentenceLength => "sentence_length",
            Extractor::ParagraphLength => "paragraph_length",
            Extractor::Readability => "readability",
            Extractor::PosFrequency => "pos_frequency",
        }
    }

    pub fn is_enabled(self, config: &AnalysisConfig) -> bool {
        let lexical = &config.lexical;
        match self {
            Extractor::FunctionWords => lexical.function_words,
            Extractor::WordLength => lexical.word_length,
            Extractor::Richness => lexical.richness.any(),
            Extractor::Legomena => lexical.legomena.any(),
            Extractor::Sentiment => lexical.sentiment,
            Extractor::SentenceLength => config.syntactic.sentence_length,
            Extractor::ParagraphLength => config.syntactic.paragraph_length,
            Extractor::Readability => lexical.readability,
            Extractor::PosFrequency => config.syntactic.pos_frequency,
        }
    }

    fn apply(
        self,
        input: &TextInput<'_>,
        env: &Environment<'_>,
        row: &mut TextFeatures,
    ) -> Result<(), AnalysisError> {
        let tokens = input.tokens;
        let lexical = &env.config.lexical;

        match self {
            Extractor::FunctionWords => {
                row.function_word_frequency =
                    Some(function_word_frequency(tokens, env.resources.stop_words()));
            }
            Extractor::WordLength => {
                row.word_length = Some(word_length_stats(tokens));
            }
            Extractor::Richness => {
                if lexical.richness.ttr {
                    row.ttr = Some(type_token_ratio(tokens));
                }
                if lexical.richness.mattr {
                    row.mattr = Some(moving_average_ttr(tokens, lexical.richness.window));
                }
            }
            Extractor::Legomena => {
                let ratios = legomena_ratios(tokens);
                let legomena = &lexical.legomena;
                row.hapax = legomena.hapax.then_some(ratios.hapax);
                row.dislegomena = legomena.dislegomena.then_some(ratios.dislegomena);
                row.trilegomina = legomena.trilegomina.then_some(ratios.trilegomina);
            }
            Extractor::Sentiment => {
                let scores = classify_text(env.classifier, input.text).map_err(|source| {
                    AnalysisError::Sentiment {
                        index: input.index,
                        source,
                    }
                })?;
                row.sentiment = Some(scores);
            }
            Extractor::SentenceLength => {
                let lengths: Vec<usize> = sentences(input.text)
                    .into_iter()
                    .map(|sentence| env.resources.tokenize(sentence).len())
                    .collect();
                row.sentence_length = Some(sentence_length_stats(tokens.len(), &lengths));
            }
            Extractor::ParagraphLength => {
                let lengths: Vec<usize> = paragraphs(input.text)
                    .into_iter()
                    .map(|paragraph| env.resources.tokenize(paragraph).len())
                    .collect();
                row.paragraph_length = Some(paragraph_length_stats(&lengths));
            }
            Extractor::Readability => {
                let sentence_count = sentences(input.text).len();
                row.flesch_kincaid = Some(flesch_kincaid_grade(sentence_count, tokens));
            }
            Extractor::PosFrequency => {
                let tagged = env.resources.pos_tag(tokens);
                row.pos_frequency = Some(pos_frequency(&tagged));
            }
        }
        Ok(())
    }
}

struct TextInput<'t> {
    index: usize,
    text: &'t str,
    tokens: &'t [String],
}

struct Environment<'a> {
    config: &'a AnalysisConfig,
    resources: &'a NlpResources,
    classifier: &'a dyn EmotionClassifier,
}

/// Sequential, single-writer analyzer for one corpus run.
///
/// Rows are appended in corpus order and transposed into a
/// [`LexicalMetrics`] container on request. A failed run stays failed.
pub struct CorpusAnalyzer<'a> {
    env: Environment<'a>,
    show_progress: bool,
    state: RunState,
    rows: Vec<TextFeatures>,
}

impl<'a> CorpusAnalyzer<'a> {
    pub fn new(
        config: &'a AnalysisConfig,
        resources: &'a NlpResources,
        classifier: &'a dyn EmotionClassifier,
    ) -> Self {
        CorpusAnalyzer {
            env: Environment {
                config,
                resources,
                classifier,
            },
            show_progress: false,
            state: RunState::Idle,
            rows: Vec::new(),
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of texts fully processed in the current run.
    pub fn processed(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[TextFeatures] {
        &self.rows
    }

    /// Compute every enabled feature for a single text.
    pub fn analyze_text(&self, index: usize, text: &str) -> Result<TextFeatures, AnalysisError> {
        let tokens = self.env.resources.tokenize(text);
        let input = TextInput {
            index,
            text,
            tokens: &tokens,
        };

        let mut row = TextFeatures {
            token_count: tokens.len(),
            ..Default::default()
        };

        for extractor in EXTRACTION_ORDER {
            if extractor.is_enabled(self.env.config) {
                extractor.apply(&input, &self.env, &mut row)?;
            }
        }

        let expected = self.env.config.enabled_columns();
        let actual = row.columns();
        if actual != expected {
            return Err(AnalysisError::RowMismatch {
                index,
                expected,
                actual,
            });
        }

        log::debug!("Text {}: {:?}", index, row);
        Ok(row)
    }

    /// Process the corpus in order, starting a fresh run.
    ///
    /// On error the analyzer moves to [`RunState::Failed`]; rows for texts
    /// before the failing one stay available through [`Self::partial_metrics`].
    pub fn run<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<(), AnalysisError> {
        if let RunState::Failed { index } = self.state {
            return Err(AnalysisError::AlreadyFailed { index });
        }
        if texts.is_empty() {
            return Err(AnalysisError::EmptyCorpus);
        }

        self.rows = Vec::with_capacity(texts.len());
        let total = texts.len();

        let enabled: Vec<&str> = EXTRACTION_ORDER
            .iter()
            .filter(|e| e.is_enabled(self.env.config))
            .map(|e| e.name())
            .collect();
        log::info!(
            "Analyzing {} texts with extractors: {}",
            total,
            enabled.join(", ")
        );

        let progress = if self.show_progress {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for (index, text) in texts.iter().enumerate() {
            self.state = RunState::Running { index, total };

            let row = match self.analyze_text(index, text.as_ref()) {
                Ok(row) => row,
                Err(err) => {
                    self.state = RunState::Failed { index };
                    if let Some(pb) = &progress {
                        pb.abandon_with_message("Failed");
                    }
                    log::error!("Analysis failed at text {}: {}", index, err);
                    return Err(err);
                }
            };
            self.rows.push(row);
            log::trace!("Processed {}/{}", index + 1, total);

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Done");
        }

        self.state = RunState::Idle;
        log::info!("Analyzed {} texts", self.rows.len());
        Ok(())
    }

    /// Rows transposed into columns, whatever the run state.
    pub fn partial_metrics(&self) -> LexicalMetrics {
        LexicalMetrics::from_rows(&self.rows)
    }

    /// Hand off the filled container. Refuses a failed run.
    pub fn into_metrics(self) -> Result<LexicalMetrics, AnalysisError> {
        if let RunState::Failed { index } = self.state {
            return Err(AnalysisError::RunFailed { index });
        }

        let metrics = LexicalMetrics::from_rows(&self.rows);
        verify_parallel(&metrics, self.env.config, self.rows.len())?;
        Ok(metrics)
    }
}

/// Check that every enabled column holds `expected` entries and every
/// disabled column is empty.
pub fn verify_parallel(
    metrics: &LexicalMetrics,
    config: &AnalysisConfig,
    expected: usize,
) -> Result<(), AnalysisError> {
    let columns = SCALAR_COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once(POS_FREQUENCY));

    for column in columns {
        let want = if config.is_column_enabled(column) {
            expected
        } else {
            0
        };
        let actual = metrics.column_len(column).unwrap_or(0);
        if actual != want {
            return Err(AnalysisError::Misaligned {
                column,
                expected: want,
                actual,
            });
        }
    }
    Ok(())
}

/// Analyze a whole corpus in one call.
pub fn analyze_corpus<S: AsRef<str>>(
    texts: &[S],
    config: &AnalysisConfig,
    resources: &NlpResources,
    classifier: &dyn EmotionClassifier,
    show_progress: bool,
) -> Result<LexicalMetrics, AnalysisError> {
    let mut analyzer = CorpusAnalyzer::new(config, resources, classifier).with_progress(show_progress);
    analyzer.run(texts)?;
    analyzer.into_metrics()
}

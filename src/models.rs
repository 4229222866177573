//! Data structures for the lexmetric feature pipeline.
//!
//! Per-text results are produced as [`TextFeatures`] rows and transposed into
//! the column-oriented [`LexicalMetrics`] container, where index `i` of every
//! populated sequence refers to the same source text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column name of the function-word frequency sequence.
pub const FUNCTION_WORD_FREQUENCY: &str = "function_word_frequency";

/// Column name of the per-text part-of-speech distribution sequence.
pub const POS_FREQUENCY: &str = "syntactic.pos_frequency";

/// Every scalar column of [`LexicalMetrics`], in extraction order.
pub const SCALAR_COLUMNS: [&str; 24] = [
    FUNCTION_WORD_FREQUENCY,
    "word_length.avg",
    "word_length.std",
    "word_length.skew",
    "word_length.kurtosis",
    "richness.ttr",
    "richness.mattr",
    "legomena.hapax",
    "legomena.dislegomena",
    "legomena.trilegomina",
    "sentiment.anger",
    "sentiment.disgust",
    "sentiment.fear",
    "sentiment.joy",
    "sentiment.neutral",
    "sentiment.sadness",
    "sentiment.surprise",
    "syntactic.sentence_length.avg",
    "syntactic.sentence_length.variance",
    "syntactic.paragraph_length.mean",
    "syntactic.paragraph_length.variance",
    "syntactic.paragraph_length.max",
    "syntactic.paragraph_length.min",
    "readability.flesch_kincaid",
];

/// The seven emotion classes, in classifier output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Disgust,
    Fear,
    Joy,
    Neutral,
    Sadness,
    Surprise,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Anger,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Joy,
        Emotion::Neutral,
        Emotion::Sadness,
        Emotion::Surprise,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Joy => "joy",
            Emotion::Neutral => "neutral",
            Emotion::Sadness => "sadness",
            Emotion::Surprise => "surprise",
        }
    }
}

/// Class probabilities for one text. Constructed through
/// [`crate::sentiment::validate_probabilities`], so the fields sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionScores {
    pub anger: f64,
    pub disgust: f64,
    pub fear: f64,
    pub joy: f64,
    pub neutral: f64,
    pub sadness: f64,
    pub surprise: f64,
}

impl EmotionScores {
    pub(crate) fn from_array(p: [f64; 7]) -> Self {
        Self {
            anger: p[0],
            disgust: p[1],
            fear: p[2],
            joy: p[3],
            neutral: p[4],
            sadness: p[5],
            surprise: p[6],
        }
    }

    pub fn to_array(&self) -> [f64; 7] {
        [
            self.anger,
            self.disgust,
            self.fear,
            self.joy,
            self.neutral,
            self.sadness,
            self.surprise,
        ]
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Anger => self.anger,
            Emotion::Disgust => self.disgust,
            Emotion::Fear => self.fear,
            Emotion::Joy => self.joy,
            Emotion::Neutral => self.neutral,
            Emotion::Sadness => self.sadness,
            Emotion::Surprise => self.surprise,
        }
    }

    /// The most probable class. Ties resolve to the earlier class in [`Emotion::ALL`].
    pub fn dominant(&self) -> Emotion {
        let mut best = Emotion::Anger;
        for emotion in Emotion::ALL {
            if self.get(emotion) > self.get(best) {
                best = emotion;
            }
        }
        best
    }
}

/// Moments of the token-length distribution of one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WordLengthStats {
    pub avg: f64,
    pub std: f64,
    pub skew: f64,
    pub kurtosis: f64,
}

/// Share of the token count made up of words seen exactly 1, 2 and 3 times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegomenaRatios {
    pub hapax: f64,
    pub dislegomena: f64,
    pub trilegomina: f64,
}

/// Tokens per sentence and spread of sentence lengths within one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceLengthStats {
    pub avg: f64,
    pub variance: f64,
}

/// Distribution of per-paragraph token counts within one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphLengthStats {
    pub mean: f64,
    pub variance: f64,
    pub max: f64,
    pub min: f64,
}

/// All features computed for a single text.
///
/// A field is `Some` exactly when its metric was enabled for the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFeatures {
    pub token_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_word_frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_length: Option<WordLengthStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mattr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hapax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dislegomena: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trilegomina: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<EmotionScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_length: Option<SentenceLengthStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_length: Option<ParagraphLengthStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flesch_kincaid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_frequency: Option<BTreeMap<String, f64>>,
}

impl TextFeatures {
    /// Names of the columns this row populates, in [`SCALAR_COLUMNS`] order
    /// followed by [`POS_FREQUENCY`].
    pub fn columns(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        if self.function_word_frequency.is_some() {
            present.push(SCALAR_COLUMNS[0]);
        }
        if self.word_length.is_some() {
            present.extend_from_slice(&SCALAR_COLUMNS[1..5]);
        }
        if self.ttr.is_some() {
            present.push(SCALAR_COLUMNS[5]);
        }
        if self.mattr.is_some() {
            present.push(SCALAR_COLUMNS[6]);
        }
        if self.hapax.is_some() {
            present.push(SCALAR_COLUMNS[7]);
        }
        if self.dislegomena.is_some() {
            present.push(SCALAR_COLUMNS[8]);
        }
        if self.trilegomina.is_some() {
            present.push(SCALAR_COLUMNS[9]);
        }
        if self.sentiment.is_some() {
            present.extend_from_slice(&SCALAR_COLUMNS[10..17]);
        }
        if self.sentence_length.is_some() {
            present.extend_from_slice(&SCALAR_COLUMNS[17..19]);
        }
        if self.paragraph_length.is_some() {
            present.extend_from_slice(&SCALAR_COLUMNS[19..23]);
        }
        if self.flesch_kincaid.is_some() {
            present.push(SCALAR_COLUMNS[23]);
        }
        if self.pos_frequency.is_some() {
            present.push(POS_FREQUENCY);
        }
        present
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordLength {
    pub avg: Vec<f64>,
    pub std: Vec<f64>,
    pub skew: Vec<f64>,
    pub kurtosis: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Richness {
    pub ttr: Vec<f64>,
    pub mattr: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Legomena {
    pub hapax: Vec<f64>,
    pub dislegomena: Vec<f64>,
    pub trilegomina: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub anger: Vec<f64>,
    pub disgust: Vec<f64>,
    pub fear: Vec<f64>,
    pub joy: Vec<f64>,
    pub neutral: Vec<f64>,
    pub sadness: Vec<f64>,
    pub surprise: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceLength {
    pub avg: Vec<f64>,
    pub variance: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphLength {
    pub mean: Vec<f64>,
    pub variance: Vec<f64>,
    pub max: Vec<f64>,
    pub min: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Syntactic {
    pub pos_frequency: Vec<BTreeMap<String, f64>>,
    pub sentence_length: SentenceLength,
    pub paragraph_length: ParagraphLength,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub flesch_kincaid: Vec<f64>,
}

/// Column-oriented results of one corpus run.
///
/// Disabled metrics keep empty sequences. Enabled metrics hold one entry per
/// processed text, in corpus order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalMetrics {
    pub word_length: WordLength,
    pub richness: Richness,
    pub legomena: Legomena,
    pub sentiment: Sentiment,
    pub function_word_frequency: Vec<f64>,
    pub syntactic: Syntactic,
    pub readability: Readability,
}

impl LexicalMetrics {
    /// Transpose per-text rows into column sequences.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a TextFeatures>,
    {
        let mut metrics = Self::default();
        for row in rows {
            metrics.push(row);
        }
        metrics
    }

    /// Append every populated field of `row` to its column.
    pub fn push(&mut self, row: &TextFeatures) {
        if let Some(value) = row.function_word_frequency {
            self.function_word_frequency.push(value);
        }
        if let Some(stats) = row.word_length {
            self.word_length.avg.push(stats.avg);
            self.word_length.std.push(stats.std);
            self.word_length.skew.push(stats.skew);
            self.word_length.kurtosis.push(stats.kurtosis);
        }
        if let Some(value) = row.ttr {
            self.richness.ttr.push(value);
        }
        if let Some(value) = row.mattr {
            self.richness.mattr.push(value);
        }
        if let Some(value) = row.hapax {
            self.legomena.hapax.push(value);
        }
        if let Some(value) = row.dislegomena {
            self.legomena.dislegomena.push(value);
        }
        if let Some(value) = row.trilegomina {
            self.legomena.trilegomina.push(value);
        }
        if let Some(scores) = row.sentiment {
            self.sentiment.anger.push(scores.anger);
            self.sentiment.disgust.push(scores.disgust);
            self.sentiment.fear.push(scores.fear);
            self.sentiment.joy.push(scores.joy);
            self.sentiment.neutral.push(scores.neutral);
            self.sentiment.sadness.push(scores.sadness);
            self.sentiment.surprise.push(scores.surprise);
        }
        if let Some(stats) = row.sentence_length {
            self.syntactic.sentence_length.avg.push(stats.avg);
            self.syntactic.sentence_length.variance.push(stats.variance);
        }
        if let Some(stats) = row.paragraph_length {
            let paragraph = &mut self.syntactic.paragraph_length;
            paragraph.mean.push(stats.mean);
            paragraph.variance.push(stats.variance);
            paragraph.max.push(stats.max);
            paragraph.min.push(stats.min);
        }
        if let Some(value) = row.flesch_kincaid {
            self.readability.flesch_kincaid.push(value);
        }
        if let Some(dist) = &row.pos_frequency {
            self.syntactic.pos_frequency.push(dist.clone());
        }
    }

    /// Scalar columns paired with their names, in [`SCALAR_COLUMNS`] order.
    pub fn scalar_columns(&self) -> [(&'static str, &[f64]); 24] {
        [
            (SCALAR_COLUMNS[0], self.function_word_frequency.as_slice()),
            (SCALAR_COLUMNS[1], self.word_length.avg.as_slice()),
            (SCALAR_COLUMNS[2], self.word_length.std.as_slice()),
            (SCALAR_COLUMNS[3], self.word_length.skew.as_slice()),
            (SCALAR_COLUMNS[4], self.word_length.kurtosis.as_slice()),
            (SCALAR_COLUMNS[5], self.richness.ttr.as_slice()),
            (SCALAR_COLUMNS[6], self.richness.mattr.as_slice()),
            (SCALAR_COLUMNS[7], self.legomena.hapax.as_slice()),
            (SCALAR_COLUMNS[8], self.legomena.dislegomena.as_slice()),
            (SCALAR_COLUMNS[9], self.legomena.trilegomina.as_slice()),
            (SCALAR_COLUMNS[10], self.sentiment.anger.as_slice()),
            (SCALAR_COLUMNS[11], self.sentiment.disgust.as_slice()),
            (SCALAR_COLUMNS[12], self.sentiment.fear.as_slice()),
            (SCALAR_COLUMNS[13], self.sentiment.joy.as_slice()),
            (SCALAR_COLUMNS[14], self.sentiment.neutral.as_slice()),
            (SCALAR_COLUMNS[15], self.sentiment.sadness.as_slice()),
            (SCALAR_COLUMNS[16], self.sentiment.surprise.as_slice()),
            (SCALAR_COLUMNS[17], self.syntactic.sentence_length.avg.as_slice()),
            (SCALAR_COLUMNS[18], self.syntactic.sentence_length.variance.as_slice()),
            (SCALAR_COLUMNS[19], self.syntactic.paragraph_length.mean.as_slice()),
            (SCALAR_COLUMNS[20], self.syntactic.paragraph_length.variance.as_slice()),
            (SCALAR_COLUMNS[21], self.syntactic.paragraph_length.max.as_slice()),
            (SCALAR_COLUMNS[22], self.syntactic.paragraph_length.min.as_slice()),
            (SCALAR_COLUMNS[23], self.readability.flesch_kincaid.as_slice()),
        ]
    }

    /// Length of the named column, or `None` for an unknown name.
    pub fn column_len(&self, column: &str) -> Option<usize> {
        if column == POS_FREQUENCY {
            return Some(self.syntactic.pos_frequency.len());
        }
        self.scalar_columns()
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, values)| values.len())
    }

    /// Number of texts represented, taken as the longest column.
    pub fn text_count(&self) -> usize {
        self.scalar_columns()
            .iter()
            .map(|(_, values)| values.len())
            .chain(std::iter::once(self.syntactic.pos_frequency.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.text_count() == 0
    }
}

/// Distribution summary of one scalar column across the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-metric summaries over every populated scalar column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub text_count: usize,
    pub metrics: Vec<MetricSummary>,
}

impl CorpusSummary {
    pub fn from_metrics(metrics: &LexicalMetrics) -> Self {
        let summaries = metrics
            .scalar_columns()
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(name, values)| summarize(name, values))
            .collect();

        CorpusSummary {
            text_count: metrics.text_count(),
            metrics: summaries,
        }
    }

    pub fn get(&self, metric: &str) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

fn summarize(name: &str, values: &[f64]) -> MetricSummary {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    MetricSummary {
        metric: name.to_string(),
        count: values.len(),
        mean,
        std: variance.sqrt(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

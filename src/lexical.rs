//! Per-text lexical feature extractors.
//!
//! Every function here is pure and takes the token sequence of one text.
//! Degenerate input (no tokens) yields zeros rather than NaN so that every
//! text always contributes a value to each enabled column.

use crate::models::{LegomenaRatios, ParagraphLengthStats, SentenceLengthStats, WordLengthStats};
use std::collections::{BTreeMap, HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Default MATTR window size, in tokens.
pub const DEFAULT_MATTR_WINDOW: usize = 100;

/// Character length of each token, counted in Unicode scalar values.
pub fn word_lengths<S: AsRef<str>>(tokens: &[S]) -> Vec<usize> {
    tokens.iter().map(|t| t.as_ref().chars().count()).collect()
}

/// Mean, population standard deviation, skewness and excess kurtosis of
/// token lengths.
///
/// Uses population moments throughout: `skew = m3 / m2^1.5` and
/// `kurtosis = m4 / m2^2 - 3`. With zero variance both shape moments are 0.
pub fn word_length_stats<S: AsRef<str>>(tokens: &[S]) -> WordLengthStats {
    let lengths: Vec<f64> = word_lengths(tokens).into_iter().map(|l| l as f64).collect();
    moments(&lengths)
}

/// Population moments of an arbitrary sample. Empty input gives all zeros.
pub fn moments(values: &[f64]) -> WordLengthStats {
    if values.is_empty() {
        return WordLengthStats::default();
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    if m2 == 0.0 {
        return WordLengthStats {
            avg: mean,
            std: 0.0,
            skew: 0.0,
            kurtosis: 0.0,
        };
    }

    WordLengthStats {
        avg: mean,
        std: m2.sqrt(),
        skew: m3 / m2.powf(1.5),
        kurtosis: m4 / (m2 * m2) - 3.0,
    }
}

/// Share of tokens that belong to the stop-word set.
pub fn function_word_frequency<S: AsRef<str>>(tokens: &[S], stop_words: &HashSet<String>) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let hits = tokens
        .iter()
        .filter(|t| stop_words.contains(t.as_ref()))
        .count();
    hits as f64 / tokens.len() as f64
}

/// Distinct tokens over total tokens.
pub fn type_token_ratio<S: AsRef<str>>(tokens: &[S]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<&str> = tokens.iter().map(|t| t.as_ref()).collect();
    distinct.len() as f64 / tokens.len() as f64
}

/// Chunked moving-average type-token ratio.
///
/// Tokens are split into consecutive, non-overlapping chunks of `window`
/// tokens; the last chunk may be shorter and is scored against its own
/// length. The result is the unweighted mean of the chunk TTRs. Texts
/// shorter than the window (and a zero window) fall back to plain TTR.
pub fn moving_average_ttr<S: AsRef<str>>(tokens: &[S], window: usize) -> f64 {
    if window == 0 || tokens.len() < window {
        return type_token_ratio(tokens);
    }

    let chunk_ttrs: Vec<f64> = tokens.chunks(window).map(type_token_ratio).collect();
    chunk_ttrs.iter().sum::<f64>() / chunk_ttrs.len() as f64
}

/// Occurrence count of every distinct token.
pub fn frequency_counts<S: AsRef<str>>(tokens: &[S]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_ref()).or_insert(0usize) += 1;
    }
    counts
}

/// Number of distinct tokens occurring exactly 1, 2 and 3 times, each
/// divided by the total token count.
pub fn legomena_ratios<S: AsRef<str>>(tokens: &[S]) -> LegomenaRatios {
    if tokens.is_empty() {
        return LegomenaRatios::default();
    }

    let (mut once, mut twice, mut thrice) = (0usize, 0usize, 0usize);
    for count in frequency_counts(tokens).into_values() {
        match count {
            1 => once += 1,
            2 => twice += 1,
            3 => thrice += 1,
            _ => {}
        }
    }

    let n = tokens.len() as f64;
    LegomenaRatios {
        hapax: once as f64 / n,
        dislegomena: twice as f64 / n,
        trilegomina: thrice as f64 / n,
    }
}

/// Share of tokens carrying each tag.
pub fn pos_frequency(tagged: &[(&str, &str)]) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (_, tag) in tagged {
        *counts.entry((*tag).to_string()).or_default() += 1;
    }

    let n = tagged.len() as f64;
    counts
        .into_iter()
        .map(|(tag, count)| (tag, count as f64 / n))
        .collect()
}

/// Sentence segments of `text` by UAX #29 sentence boundaries. Segments
/// with no alphanumeric character (trailing whitespace, stray punctuation)
/// are not sentences.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split_sentence_bounds()
        .filter(|segment| segment.chars().any(char::is_alphanumeric))
        .collect()
}

/// Paragraphs separated by a blank line. Text without a separator, including
/// empty text, is a single paragraph.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n").collect()
}

/// Rough English syllable count: runs of vowels (`aeiouy`), minus one for a
/// trailing `e`, never below 1.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    let mut count = 0usize;
    let mut previous_was_vowel = false;
    for c in word.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = is_vowel;
    }
    if word.ends_with('e') {
        count = count.saturating_sub(1);
    }
    count.max(1)
}

fn mean_and_variance(values: &[usize]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance)
}

/// Tokens per sentence and the population variance of per-sentence token
/// counts. The average is taken over the whole text's `token_count`.
pub fn sentence_length_stats(token_count: usize, sentence_lengths: &[usize]) -> SentenceLengthStats {
    if sentence_lengths.is_empty() {
        return SentenceLengthStats::default();
    }
    let (_, variance) = mean_and_variance(sentence_lengths);
    SentenceLengthStats {
        avg: token_count as f64 / sentence_lengths.len() as f64,
        variance,
    }
}

/// Mean, population variance, maximum and minimum of per-paragraph token
/// counts.
pub fn paragraph_length_stats(paragraph_lengths: &[usize]) -> ParagraphLengthStats {
    let (mean, variance) = mean_and_variance(paragraph_lengths);
    ParagraphLengthStats {
        mean,
        variance,
        max: paragraph_lengths.iter().copied().max().unwrap_or(0) as f64,
        min: paragraph_lengths.iter().copied().min().unwrap_or(0) as f64,
    }
}

/// Flesch-Kincaid grade level:
/// `0.39 * (words / sentences) + 11.8 * (syllables / words) - 15.59`.
/// Zero when there are no sentences or no tokens.
pub fn flesch_kincaid_grade<S: AsRef<str>>(sentence_count: usize, tokens: &[S]) -> f64 {
    if sentence_count == 0 || tokens.is_empty() {
        return 0.0;
    }
    let words = tokens.len() as f64;
    let syllables: usize = tokens.iter().map(|t| count_syllables(t.as_ref())).sum();
    0.39 * (words / sentence_count as f64) + 11.8 * (syllables as f64 / words) - 15.59
}

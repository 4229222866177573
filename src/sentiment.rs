//! Emotion classification over raw text.
//!
//! The analyzer talks to any [`EmotionClassifier`] and validates its output
//! before accepting it: a malformed probability vector is an error for that
//! text, never a silent zero.

use crate::models::{Emotion, EmotionScores};
use crate::tokenize::{Tokenizer, WordTokenizer};
use std::collections::HashMap;
use thiserror::Error;

/// Tolerance for the probability vector summing to 1.
pub const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SentimentError {
    #[error("Classifier failed: {0}")]
    Classifier(String),
    #[error("Classifier returned {0} probabilities, expected 7")]
    WrongArity(usize),
    #[error("Invalid probability {value} for class {emotion}")]
    InvalidProbability { emotion: &'static str, value: f64 },
    #[error("Probabilities sum to {0}, expected 1")]
    NotNormalized(f64),
}

/// A 7-way emotion classifier.
///
/// Implementations return raw class probabilities in [`Emotion::ALL`] order.
pub trait EmotionClassifier {
    fn classify(&self, text: &str) -> Result<Vec<f64>, SentimentError>;
}

/// Check a classifier output and convert it into [`EmotionScores`].
pub fn validate_probabilities(probabilities: &[f64]) -> Result<EmotionScores, SentimentError> {
    let values: [f64; 7] = probabilities
        .try_into()
        .map_err(|_| SentimentError::WrongArity(probabilities.len()))?;

    for (emotion, &value) in Emotion::ALL.iter().zip(values.iter()) {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(SentimentError::InvalidProbability {
                emotion: emotion.as_str(),
                value,
            });
        }
    }

    let sum: f64 = values.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(SentimentError::NotNormalized(sum));
    }

    Ok(EmotionScores::from_array(values))
}

/// Classify and validate in one step.
pub fn classify_text<C>(classifier: &C, text: &str) -> Result<EmotionScores, SentimentError>
where
    C: EmotionClassifier + ?Sized,
{
    let probabilities = classifier.classify(text)?;
    validate_probabilities(&probabilities)
}

const ANGER: &[&str] = &[
    "angry", "anger", "furious", "rage", "outrage", "outraged", "hate", "hated", "mad",
    "annoyed", "irritated", "hostile", "resent", "fight", "attack", "blame", "infuriating",
];

const DISGUST: &[&str] = &[
    "disgust", "disgusting", "disgusted", "gross", "vile", "revolting", "nasty", "filthy",
    "sickening", "repulsive", "awful", "rotten", "corrupt", "contempt",
];

const FEAR: &[&str] = &[
    "fear", "afraid", "scared", "terrified", "terror", "panic", "anxious", "anxiety", "worry",
    "worried", "threat", "danger", "dangerous", "dread", "nervous", "frightened",
];

const JOY: &[&str] = &[
    "happy", "joy", "glad", "delighted", "love", "loved", "wonderful", "great", "excellent",
    "proud", "hope", "hopeful", "celebrate", "pleased", "grateful", "thank", "thanks", "enjoy",
    "good", "success",
];

const SADNESS: &[&str] = &[
    "sad", "sadness", "unhappy", "grief", "grieve", "mourn", "sorrow", "cry", "cried", "tears",
    "lonely", "loss", "lost", "depressed", "heartbroken", "miss", "regret", "tragic",
];

const SURPRISE: &[&str] = &[
    "surprise", "surprised", "surprising", "amazing", "amazed", "astonished", "shocked",
    "unexpected", "sudden", "suddenly", "wow", "incredible", "unbelievable", "startled",
];

/// Keyword-lexicon emotion classifier.
///
/// Counts lexicon hits per class; `neutral` receives a prior of 1 plus
/// `neutral_weight` for every token that hits no class. The counts are then
/// normalized to a distribution. Fully deterministic.
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    lexicon: HashMap<&'static str, Emotion>,
    neutral_weight: f64,
}

impl LexiconClassifier {
    pub fn new() -> Self {
        let mut lexicon = HashMap::new();
        let classes: [(Emotion, &[&'static str]); 6] = [
            (Emotion::Anger, ANGER),
            (Emotion::Disgust, DISGUST),
            (Emotion::Fear, FEAR),
            (Emotion::Joy, JOY),
            (Emotion::Sadness, SADNESS),
            (Emotion::Surprise, SURPRISE),
        ];
        for (emotion, words) in classes {
            for &word in words {
                lexicon.insert(word, emotion);
            }
        }

        LexiconClassifier {
            lexicon,
            neutral_weight: 0.1,
        }
    }

    pub fn with_neutral_weight(mut self, weight: f64) -> Self {
        self.neutral_weight = weight.max(0.0);
        self
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EmotionClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Vec<f64>, SentimentError> {
        let mut scores = [0.0f64; 7];
        let neutral = Emotion::Neutral as usize;
        scores[neutral] = 1.0;

        for token in WordTokenizer.tokenize(text) {
            match self.lexicon.get(token.as_str()) {
                Some(&emotion) => scores[emotion as usize] += 1.0,
                None => scores[neutral] += self.neutral_weight,
            }
        }

        let total: f64 = scores.iter().sum();
        Ok(scores.iter().map(|s| s / total).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier(Vec<f64>);

    impl EmotionClassifier for FixedClassifier {
        fn classify(&self, _text: &str) -> Result<Vec<f64>, SentimentError> {
            Ok(self.0.clone())
        }
    }

    fn sum(scores: &EmotionScores) -> f64 {
        scores.to_array().iter().sum()
    }

    #[test]
    fn test_validate_accepts_distribution() {
        let scores = validate_probabilities(&[0.1, 0.1, 0.1, 0.4, 0.2, 0.05, 0.05]).unwrap();
        assert_eq!(scores.joy, 0.4);
        assert_eq!(scores.surprise, 0.05);
    }

    #[test]
    fn test_validate_rejects_wrong_arity() {
        let err = validate_probabilities(&[0.5, 0.5]).unwrap_err();
        assert_eq!(err, SentimentError::WrongArity(2));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = validate_probabilities(&[1.2, -0.2, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            SentimentError::InvalidProbability { emotion: "anger", .. }
        ));

        let err = validate_probabilities(&[f64::NAN, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, SentimentError::InvalidProbability { .. }));
    }

    #[test]
    fn test_validate_rejects_unnormalized() {
        let err = validate_probabilities(&[0.0; 7]).unwrap_err();
        assert_eq!(err, SentimentError::NotNormalized(0.0));
    }

    #[test]
    fn test_classify_text_propagates_validation() {
        let bad = FixedClassifier(vec![0.2; 7]);
        assert!(matches!(
            classify_text(&bad, "anything"),
            Err(SentimentError::NotNormalized(_))
        ));
    }

    #[test]
    fn test_lexicon_empty_text_is_neutral() {
        let scores = classify_text(&LexiconClassifier::new(), "").unwrap();
        assert_eq!(scores.neutral, 1.0);
        assert_eq!(scores.dominant(), Emotion::Neutral);
    }

    #[test]
    fn test_lexicon_detects_emotion() {
        let classifier = LexiconClassifier::new();

        let joyful = classify_text(&classifier, "I am so happy and proud, what a wonderful day").unwrap();
        assert_eq!(joyful.dominant(), Emotion::Joy);
        assert!((sum(&joyful) - 1.0).abs() < SUM_TOLERANCE);

        let afraid = classify_text(&classifier, "Scared, terrified, afraid of the dark").unwrap();
        assert_eq!(afraid.dominant(), Emotion::Fear);
        assert!(afraid.joy == 0.0);
    }

    #[test]
    fn test_lexicon_is_deterministic() {
        let classifier = LexiconClassifier::new();
        let text = "The sudden loss left everyone shocked and sad.";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }
}

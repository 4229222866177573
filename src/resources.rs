//! Shared, read-only NLP resources.
//!
//! Built once per process and passed by reference into the analyzer, so the
//! stop-word set and the tokenizer/tagger are never rebuilt per text.

use crate::tokenize::{LexiconTagger, PosTagger, Tokenizer, WordTokenizer};
use std::collections::HashSet;
use std::fmt;

/// English function words (the common 179-entry stop-word list).
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Stop words, tokenizer and tagger bundled for one process.
pub struct NlpResources {
    stop_words: HashSet<String>,
    tokenizer: Box<dyn Tokenizer + Send + Sync>,
    tagger: Box<dyn PosTagger + Send + Sync>,
}

impl NlpResources {
    /// English stop words with the default tokenizer and tagger.
    pub fn english() -> Self {
        Self::with_stop_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    /// Custom stop-word set with the default tokenizer and tagger.
    /// Words are lowercased to match token normalization.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        log::debug!("Loaded {} stop words", stop_words.len());

        NlpResources {
            stop_words,
            tokenizer: Box::new(WordTokenizer),
            tagger: Box::new(LexiconTagger),
        }
    }

    pub fn with_tokenizer<T>(mut self, tokenizer: T) -> Self
    where
        T: Tokenizer + Send + Sync + 'static,
    {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    pub fn with_tagger<T>(mut self, tagger: T) -> Self
    where
        T: PosTagger + Send + Sync + 'static,
    {
        self.tagger = Box::new(tagger);
        self
    }

    pub fn stop_words(&self) -> &HashSet<String> {
        &self.stop_words
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    pub fn pos_tag<'a>(&self, tokens: &'a [String]) -> Vec<(&'a str, &'static str)> {
        self.tagger.pos_tag(tokens)
    }
}

impl fmt::Debug for NlpResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NlpResources")
            .field("stop_words", &self.stop_words.len())
            .finish_non_exhaustive()
    }
}

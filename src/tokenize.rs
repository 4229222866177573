//! Tokenization and part-of-speech tagging.
//!
//! Both are exposed as traits so a heavier NLP backend can be swapped in;
//! the defaults here are self-contained and deterministic.

use unicode_segmentation::UnicodeSegmentation;

/// Splits raw text into lowercase word tokens with punctuation removed.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Assigns a part-of-speech tag to every token, preserving order.
pub trait PosTagger {
    fn pos_tag<'a>(&self, tokens: &'a [String]) -> Vec<(&'a str, &'static str)>;
}

/// UAX #29 word-boundary tokenizer.
///
/// Segments that contain no alphanumeric character (whitespace, punctuation
/// runs, symbols) are dropped. Word-internal apostrophes and periods are
/// kept, so "don't" and "e.g" stay single tokens. Typographic apostrophes
/// are folded to ASCII, so "don’t" matches the stop word "don't".
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_word_bounds()
            .filter(|segment| segment.chars().any(char::is_alphanumeric))
            .map(normalize_token)
            .collect()
    }
}

fn normalize_token(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{02BC}' => '\'',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

pub const DET: &str = "DET";
pub const PRON: &str = "PRON";
pub const ADP: &str = "ADP";
pub const CONJ: &str = "CONJ";
pub const AUX: &str = "AUX";
pub const PART: &str = "PART";
pub const ADV: &str = "ADV";
pub const ADJ: &str = "ADJ";
pub const VERB: &str = "VERB";
pub const NOUN: &str = "NOUN";
pub const NUM: &str = "NUM";

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no",
    "all", "both", "either", "neither", "another", "such", "my", "your", "our", "their", "its",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "her", "it", "we", "us", "they", "them", "myself",
    "yourself", "himself", "herself", "itself", "ourselves", "yourselves", "themselves", "mine",
    "yours", "his", "hers", "ours", "theirs", "who", "whom", "whose", "what", "which",
    "someone", "anyone", "everyone", "nobody", "something", "anything", "everything", "nothing",
];

const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down", "out",
    "off", "over", "under", "across", "along", "among", "around", "behind", "beside", "beyond",
    "near", "onto", "toward", "towards", "upon", "within", "without", "via",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "yet", "so", "because", "although", "though", "while", "if",
    "unless", "until", "than", "whether", "whereas", "since",
];

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
    "must",
];

const PARTICLES: &[&str] = &["not", "n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

const ADVERBS: &[&str] = &[
    "very", "too", "also", "just", "then", "there", "here", "now", "always", "never", "often",
    "quite", "really", "still", "already", "again", "once", "soon", "ever", "almost", "even",
    "only", "well", "how", "when", "where", "why", "perhaps", "rather", "indeed",
];

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "twenty", "hundred", "thousand", "million", "billion",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "able", "ible", "ive", "less", "ical", "ish", "ic", "al", "est",
];

const NOUN_SUFFIXES: &[&str] = &["tion", "sion", "ment", "ness", "ity", "ship", "ism", "ance", "ence"];

/// Closed-class lexicon with suffix heuristics for open-class words.
///
/// Produces a coarse universal-style tagset; unknown words default to `NOUN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn tag_word(&self, word: &str) -> &'static str {
        if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
            || NUMBER_WORDS.contains(&word)
        {
            return NUM;
        }
        if DETERMINERS.contains(&word) {
            return DET;
        }
        if PRONOUNS.contains(&word) {
            return PRON;
        }
        if ADPOSITIONS.contains(&word) {
            return ADP;
        }
        if CONJUNCTIONS.contains(&word) {
            return CONJ;
        }
        if AUXILIARIES.contains(&word) || word.ends_with("n't") {
            return AUX;
        }
        if PARTICLES.contains(&word) {
            return PART;
        }
        if ADVERBS.contains(&word) || (word.len() > 4 && word.ends_with("ly")) {
            return ADV;
        }
        if NOUN_SUFFIXES.iter().any(|s| word.len() > s.len() + 2 && word.ends_with(s)) {
            return NOUN;
        }
        if word.len() > 4 && (word.ends_with("ing") || word.ends_with("ed")) {
            return VERB;
        }
        if ADJECTIVE_SUFFIXES
            .iter()
            .any(|s| word.len() > s.len() + 2 && word.ends_with(s))
        {
            return ADJ;
        }
        NOUN
    }
}

impl PosTagger for LexiconTagger {
    fn pos_tag<'a>(&self, tokens: &'a [String]) -> Vec<(&'a str, &'static str)> {
        tokens
            .iter()
            .map(|token| (token.as_str(), self.tag_word(token)))
            .collect()
    }
}

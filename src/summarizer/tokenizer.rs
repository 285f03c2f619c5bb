//! English sentence/word splitting, stop words and stemming.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fmt;
use stop_words::{LANGUAGE, get};
use unicode_segmentation::UnicodeSegmentation;

pub struct EnglishTokenizer {
    stemmer: Stemmer,
    stop_words: HashSet<String>,
}

impl Default for EnglishTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnglishTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnglishTokenizer")
            .field("stop_words", &self.stop_words.len())
            .finish()
    }
}

impl EnglishTokenizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            stop_words: get(LANGUAGE::English)
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }

    /// Split text into trimmed, non-empty sentences (UAX #29 boundaries).
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Word tokens of a sentence. Numbers and punctuation are dropped.
    pub fn words<'a>(&self, sentence: &'a str) -> impl Iterator<Item = &'a str> {
        sentence.unicode_words().filter(|w| is_word(w))
    }

    pub fn is_stop_word(&self, normalized: &str) -> bool {
        self.stop_words.contains(normalized)
    }

    /// Lowercase and stem a word.
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(&normalize(word)).into_owned()
    }
}

pub fn normalize(word: &str) -> String {
    word.to_lowercase()
}

/// A word starts with a letter and contains only letters, apostrophes and hyphens.
fn is_word(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => {
            chars.all(|c| c.is_alphabetic() || matches!(c, '\'' | '\u{2019}' | '-'))
        }
        _ => false,
    }
}

//! Extractive summarization of article text into a short highlight.
//!
//! The [`Summarizer`] asks a [`SentenceExtractor`] (by default the
//! [`LsaExtractor`]) for the most representative sentences. When nothing
//! comes back it falls back to the opening words of the text, so a highlight
//! is always produced. The [`Highlight`] records which path was taken.

pub mod lsa;
pub mod tokenizer;

pub use lsa::LsaExtractor;

use crate::config::Config;
use crate::utils::char_prefix;
use tracing::{debug, instrument};

/// Why the leading-words fallback was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No sentence could be found in the text.
    EmptyInput,
    /// Every word was a stop word, a number or punctuation.
    NoVocabulary,
    /// The extractor ran but selected nothing usable.
    NothingSelected,
}

/// Picks representative sentences out of a text.
pub trait SentenceExtractor {
    /// Return up to `count` sentences, in document order.
    fn extract(&self, text: &str, count: usize) -> Result<Vec<String>, FallbackReason>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    Extracted { text: String, sentences: usize },
    Fallback { text: String, reason: FallbackReason },
}

impl Highlight {
    pub fn text(&self) -> &str {
        match self {
            Highlight::Extracted { text, .. } | Highlight::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Highlight::Extracted { text, .. } | Highlight::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Highlight::Fallback { .. })
    }
}

#[derive(Debug)]
pub struct Summarizer<E = LsaExtractor> {
    extractor: E,
    sentence_count: usize,
    fallback_words: usize,
    /// Longer texts are cut to this many characters before extraction.
    max_input_chars: Option<usize>,
}

impl Summarizer<LsaExtractor> {
    /// English LSA summarizer sized by `summary_sentence_count` and
    /// `summary_fallback_words`, reading at most `max_content_chars` of each
    /// text.
    pub fn from_config(config: &Config) -> Self {
        Self::with_extractor(
            LsaExtractor::new(),
            config.summary_sentence_count,
            config.summary_fallback_words,
        )
        .with_input_limit(config.max_content_chars)
    }
}

impl<E: SentenceExtractor> Summarizer<E> {
    pub fn with_extractor(extractor: E, sentence_count: usize, fallback_words: usize) -> Self {
        Self {
            extractor,
            sentence_count,
            fallback_words,
            max_input_chars: None,
        }
    }

    pub fn with_input_limit(mut self, max_chars: usize) -> Self {
        self.max_input_chars = Some(max_chars);
        self
    }

    /// Summarize `text` into at most `sentence_count` sentences.
    #[instrument(level = "debug", skip_all, fields(chars = text.len()))]
    pub fn summarize(&self, text: &str) -> Highlight {
        let text = match self.max_input_chars {
            Some(max) => char_prefix(text, max),
            None => text,
        };
        let reason = match self.extractor.extract(text, self.sentence_count) {
            Ok(sentences) => {
                let joined = sentences.join(" ");
                let summary = joined.trim();
                if summary.is_empty() {
                    FallbackReason::NothingSelected
                } else {
                    return Highlight::Extracted {
                        text: summary.to_string(),
                        sentences: sentences.len(),
                    };
                }
            }
            Err(reason) => reason,
        };

        debug!(?reason, "Falling back to leading words");
        Highlight::Fallback {
            text: leading_words(text, self.fallback_words),
            reason,
        }
    }

    /// Summarize each text independently, preserving order.
    pub fn batch_summarize<I, S>(&self, texts: I) -> Vec<Highlight>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| self.summarize(text.as_ref()))
            .collect()
    }
}

/// The first `count` whitespace-separated words, joined by single spaces.
fn leading_words(text: &str, count: usize) -> String {
    text.split_whitespace()
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
}

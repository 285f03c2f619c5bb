//! Data models for articles and the digest built from them.
//!
//! - [`Article`]: a news item identified by its URL, as yielded by a source
//!   and later enriched in place
//! - [`Digest`]: one rendered edition, holding a [`DigestEntry`] per article

use serde::{Deserialize, Serialize};

/// A news article flowing through the pipeline.
///
/// `content` is the article body. It is either supplied by the source or
/// filled in by the enricher from the linked page. `summary` is whatever
/// short description the source provided (e.g. an RSS `<description>`) and
/// is only used when no body is available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Name of the feed or file the article came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// True when the article carries a non-empty body.
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// The text to summarize: the body if present, else the source summary.
    pub fn primary_text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .filter(|c| !c.is_empty())
            .or_else(|| self.summary.as_deref().filter(|s| !s.is_empty()))
    }

    /// Extract the domain name (before .com/.org/etc) from the URL.
    /// For example: "https://lite.cnn.com/article" -> "cnn"
    pub fn source_tag(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 {
            Some(parts[parts.len() - 2].to_string())
        } else {
            None
        }
    }
}

/// One rendered edition of the digest.
///
/// # Edition Naming
///
/// The `edition` field is one of:
/// - `"morning"`: 00:00 - 08:00
/// - `"afternoon"`: 08:00 - 16:00
/// - `"evening"`: 16:00 - 24:00
#[derive(Debug, Deserialize, Serialize)]
pub struct Digest {
    pub title: String,
    /// The date of publication in `YYYY-MM-DD` format.
    pub local_date: String,
    pub edition: String,
    pub local_time: String,
    pub entries: Vec<DigestEntry>,
}

/// A single article as it appears in the digest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DigestEntry {
    pub title: String,
    pub url: String,
    pub source_tag: Option<String>,
    /// Summarized text; empty when the article had no text at all.
    pub highlight: String,
    /// The highlight is the leading words of the text, not ranked sentences.
    pub fallback: bool,
    /// The body was scraped from the article page during this run.
    pub enriched: bool,
}

impl Digest {
    /// File name of this edition's markdown, e.g. `2025-05-06_morning.md`.
    pub fn markdown_filename(&self) -> String {
        format!("{}_{}.md", self.local_date, self.edition)
    }
}

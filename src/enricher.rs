//! Best-effort article enrichment.
//!
//! An article that arrives without a body gets one scraped from its page.
//! Enrichment never fails: every failure leaves the article untouched and is
//! reported through the returned [`Enrichment`] value instead.

use crate::error::FetchError;
use crate::extractor;
use crate::fetcher::Fetch;
use crate::models::Article;
use crate::utils::char_prefix;
use tracing::{debug, info, instrument};

/// What `enrich` did to an article.
#[derive(Debug)]
pub enum Enrichment {
    /// The article already had a body; nothing was fetched.
    AlreadyPresent,
    /// The body was scraped and stored.
    Enriched { chars: usize, truncated: bool },
    /// The article was left as it was.
    Skipped(SkipReason),
}

#[derive(Debug)]
pub enum SkipReason {
    Fetch(FetchError),
    /// The page had no usable paragraph text.
    NoText,
}

impl Enrichment {
    pub fn is_enriched(&self) -> bool {
        matches!(self, Enrichment::Enriched { .. })
    }
}

/// Fills in missing article bodies using a [`Fetch`] implementation.
#[derive(Debug)]
pub struct Enricher<F> {
    fetcher: F,
    max_content_chars: usize,
}

impl<F: Fetch> Enricher<F> {
    pub fn new(fetcher: F, max_content_chars: usize) -> Self {
        Self {
            fetcher,
            max_content_chars,
        }
    }

    #[cfg(test)]
    fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Populate `article.content` from its page when it has none.
    #[instrument(level = "debug", skip_all, fields(url = %article.url))]
    pub async fn enrich(&self, article: &mut Article) -> Enrichment {
        if article.has_content() {
            return Enrichment::AlreadyPresent;
        }

        let page = match self.fetcher.fetch(&article.url).await {
            Ok(page) => page,
            Err(e) => {
                debug!(error = %e, status = ?e.status(), "Unable to fetch article body");
                return Enrichment::Skipped(SkipReason::Fetch(e));
            }
        };

        let Some(text) = extractor::extract(&page.body) else {
            debug!("Article page has no paragraph text");
            return Enrichment::Skipped(SkipReason::NoText);
        };

        let (text, truncated) = truncate_chars(text, self.max_content_chars);
        let chars = text.chars().count();
        info!(chars, truncated, "Enriched article");
        article.content = Some(text);
        Enrichment::Enriched { chars, truncated }
    }

    /// Enrich `article`, then return the text best suited for summarizing
    /// along with what enrichment did.
    pub async fn best_text(&self, article: &mut Article) -> (Enrichment, Option<String>) {
        let outcome = self.enrich(article).await;
        (outcome, article.primary_text().map(str::to_string))
    }
}

/// Cut `text` to at most `max` characters, ignoring word boundaries.
fn truncate_chars(mut text: String, max: usize) -> (String, bool) {
    let keep = char_prefix(&text, max).len();
    let truncated = keep < text.len();
    text.truncate(keep);
    (text, truncated)
}

//! Digest assembly: enrich and summarize every article, in order.
//!
//! Articles are processed one at a time in input order. Each article is
//! independent, so a failure on one (unreachable page, no text) only
//! degrades that article's entry and never stops the run.

use crate::config::Config;
use crate::enricher::{Enricher, Enrichment, SkipReason};
use crate::fetcher::Fetch;
use crate::models::{Article, Digest, DigestEntry};
use crate::summarizer::{SentenceExtractor, Summarizer};
use crate::utils::{edition_for, truncate_for_log};
use chrono::{DateTime, Local};
use tracing::{debug, info, instrument, warn};

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub enriched: usize,
    pub fetch_failures: usize,
    pub fallbacks: usize,
    pub without_text: usize,
}

/// Run the pipeline over `articles` and assemble the digest.
#[instrument(level = "info", skip_all, fields(articles = articles.len()))]
pub async fn build<F, E>(
    config: &Config,
    articles: Vec<Article>,
    enricher: &Enricher<F>,
    summarizer: &Summarizer<E>,
    now: DateTime<Local>,
) -> (Digest, RunStats)
where
    F: Fetch,
    E: SentenceExtractor,
{
    let mut stats = RunStats {
        total: articles.len(),
        ..RunStats::default()
    };
    let mut entries = Vec::with_capacity(articles.len());

    for (index, mut article) in articles.into_iter().enumerate() {
        debug!(index, url = %article.url, "Processing article");

        let (outcome, text) = enricher.best_text(&mut article).await;
        match &outcome {
            Enrichment::Enriched { .. } => stats.enriched += 1,
            Enrichment::Skipped(SkipReason::Fetch(_)) => stats.fetch_failures += 1,
            Enrichment::Skipped(SkipReason::NoText) | Enrichment::AlreadyPresent => {}
        }

        let (highlight, fallback) = match text {
            Some(text) => {
                let highlight = summarizer.summarize(&text);
                let fallback = highlight.is_fallback();
                (highlight.into_text(), fallback)
            }
            None => {
                warn!(index, url = %article.url, "Article has no text to summarize");
                stats.without_text += 1;
                (String::new(), false)
            }
        };
        if fallback {
            stats.fallbacks += 1;
        }
        debug!(
            index,
            fallback,
            highlight = %truncate_for_log(&highlight, 120),
            "Summarized article"
        );

        entries.push(DigestEntry {
            source_tag: article.source_tag(),
            title: article.title,
            url: article.url,
            highlight,
            fallback,
            enriched: outcome.is_enriched(),
        });
    }

    info!(
        total = stats.total,
        enriched = stats.enriched,
        fetch_failures = stats.fetch_failures,
        fallbacks = stats.fallbacks,
        without_text = stats.without_text,
        "Digest assembled"
    );

    let digest = Digest {
        title: config.digest_title.clone(),
        local_date: now.date_naive().to_string(),
        edition: edition_for(now.time()).to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        entries,
    };
    (digest, stats)
}

//! Article sources: where the initial article list comes from.
//!
//! Two kinds of sources are supported:
//!
//! | Source | Function | Notes |
//! |--------|----------|-------|
//! | Local file | [`load_articles`] | JSON (`.json`) or YAML list of [`Article`] |
//! | RSS / Atom feed | [`fetch_feed`] | Fetched through the retrying fetcher |
//!
//! [`collect`] merges both, in order, and drops duplicate URLs.

use crate::error::SourceError;
use crate::extractor::plain_text;
use crate::fetcher::Fetch;
use crate::models::Article;
use feed_rs::parser;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Read an article list from a JSON or YAML file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_articles(path: &Path) -> Result<Vec<Article>, SourceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let articles: Vec<Article> = if is_json {
        serde_json::from_str(&raw)?
    } else {
        serde_yaml::from_str(&raw)?
    };

    info!(count = articles.len(), "Loaded articles from file");
    Ok(articles)
}

/// Parse an RSS or Atom document into articles.
///
/// Entries without a link are skipped; relative links are resolved against
/// `feed_url`.
pub fn parse_feed(feed_url: &str, body: &[u8]) -> Result<Vec<Article>, SourceError> {
    let feed = parser::parse(body).map_err(|e| SourceError::Feed {
        url: feed_url.to_string(),
        reason: e.to_string(),
    })?;
    let base = Url::parse(feed_url).ok();
    let feed_title = feed.title.as_ref().map(|t| t.content.trim().to_string());

    let mut articles = Vec::new();
    for entry in feed.entries {
        let Some(href) = entry.links.first().map(|l| l.href.trim().to_string()) else {
            debug!(id = %entry.id, "Feed entry has no link; skipping");
            continue;
        };
        let url = match &base {
            Some(base) => base.join(&href).map(|u| u.to_string()).unwrap_or(href),
            None => href,
        };

        let title = entry
            .title
            .as_ref()
            .map(|t| plain_text(&t.content))
            .unwrap_or_default();
        let summary = entry
            .summary
            .as_ref()
            .map(|s| plain_text(&s.content))
            .filter(|s| !s.is_empty());

        articles.push(Article {
            title,
            url,
            content: None,
            summary,
            source: feed_title.clone().filter(|t| !t.is_empty()),
            published: entry.published.or(entry.updated).map(|d| d.to_rfc3339()),
        });
    }
    Ok(articles)
}

/// Fetch a feed with `fetcher` and parse it.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_feed<F: Fetch>(fetcher: &F, url: &str) -> Result<Vec<Article>, SourceError> {
    let page = fetcher.fetch(url).await?;
    let articles = parse_feed(url, page.body.as_bytes())?;
    info!(count = articles.len(), "Fetched feed");
    Ok(articles)
}

/// Number of feeds fetched at once.
const FEED_CONCURRENCY: usize = 4;

/// Gather articles from an optional input file and any number of feeds.
///
/// A missing or malformed input file is an error. A failing feed is logged
/// and skipped. Feeds are fetched concurrently but merged in the order they
/// were given. When the same URL appears twice the first occurrence wins.
pub async fn collect<F: Fetch>(
    fetcher: &F,
    input: Option<&Path>,
    feeds: &[String],
) -> Result<Vec<Article>, SourceError> {
    let mut articles = match input {
        Some(path) => load_articles(path)?,
        None => Vec::new(),
    };

    let results: Vec<_> = stream::iter(feeds)
        .map(|feed| async move { (feed, fetch_feed(fetcher, feed).await) })
        .buffered(FEED_CONCURRENCY)
        .collect()
        .await;

    for (feed, result) in results {
        match result {
            Ok(mut items) => articles.append(&mut items),
            Err(e) => warn!(%feed, error = %e, "Feed failed; skipping"),
        }
    }

    let total = articles.len();
    let articles: Vec<Article> = articles
        .into_iter()
        .unique_by(|a| a.url.clone())
        .collect();
    info!(
        count = articles.len(),
        duplicates = total - articles.len(),
        "Collected articles"
    );
    Ok(articles)
}

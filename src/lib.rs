//! # News Digest
//!
//! Builds a periodic news digest: collects articles from a local list and/or
//! RSS/Atom feeds, scrapes the body of articles that arrive without one,
//! summarizes each body with LSA extractive summarization, and renders a
//! Markdown report.
//!
//! ## Architecture
//!
//! The application follows a linear pipeline:
//! 1. **Collecting** ([`sources`]): load articles from the input file and feeds
//! 2. **Enriching** ([`enricher`]): fetch ([`fetcher`]) and scrape
//!    ([`extractor`]) pages for articles without a body; failures fall back
//!    to the article as it was
//! 3. **Summarizing** ([`summarizer`]): pick the top sentences of each body,
//!    or its opening words
//! 4. **Output** ([`digest`], [`outputs`]): assemble and write the Markdown
//!    digest, optionally JSON

pub mod cli;
pub mod config;
pub mod digest;
pub mod enricher;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod outputs;
pub mod sources;
pub mod summarizer;
pub mod utils;

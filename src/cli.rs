//! Command-line interface definitions for the news digest.
//!
//! All options can be provided via command-line flags; the config path and
//! output locations can also come from environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Summarize a local article list with the default config
/// news_digest -i articles.json
///
/// # Pull two feeds and write the digest to a fixed path
/// news_digest --feed https://example.com/rss --feed https://example.org/atom -o digest.md
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to config.yaml (defaults to ./config.yaml when present)
    #[arg(short, long, env = "NEWS_DIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON or YAML file with the articles to digest
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Extra RSS/Atom feed URL (repeatable; added to the configured feeds)
    #[arg(long = "feed")]
    pub feeds: Vec<String>,

    /// Write the Markdown digest here instead of the configured digest_dir
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the digest as JSON under this directory
    #[arg(short, long, env = "NEWS_DIGEST_JSON_DIR")]
    pub json_output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

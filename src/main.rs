//! Command-line entry point: collect articles, build the digest, write it.
//!
//! ```sh
//! news_digest -i articles.json -o digest.md
//! ```

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use news_digest::cli::Cli;
use news_digest::config::Config;
use news_digest::enricher::Enricher;
use news_digest::fetcher::build_fetcher;
use news_digest::outputs::{json, markdown};
use news_digest::summarizer::Summarizer;
use news_digest::utils::validate_output_path;
use news_digest::{digest, sources};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // --- Tracing init ---
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");
    debug!(?args.input, ?args.output, feeds = args.feeds.len(), "Parsed CLI arguments");

    // ---- Config ----
    let mut config = Config::load_or_default(args.config.as_deref())?;
    config.feeds.extend(args.feeds.iter().cloned());

    // Fail on a bad output path before doing any network work.
    let explicit_output = match &args.output {
        Some(path) => match validate_output_path(path) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Invalid output path");
                return Err(e.into());
            }
        },
        None => None,
    };

    // ---- Collect articles ----
    let fetcher = build_fetcher(&config)?;
    let articles = sources::collect(&fetcher, args.input.as_deref(), &config.feeds).await?;
    if articles.is_empty() {
        warn!("No articles collected; the digest will be empty (pass --input or configure feeds)");
    }

    // ---- Enrich + summarize ----
    let enricher = Enricher::new(fetcher, config.max_content_chars);
    let summarizer = Summarizer::from_config(&config);
    let (digest, stats) =
        digest::build(&config, articles, &enricher, &summarizer, Local::now()).await;

    // ---- Markdown output ----
    let markdown_path = match explicit_output {
        Some(path) => path,
        None => {
            tokio::fs::create_dir_all(&config.digest_dir).await?;
            config.digest_dir.join(digest.markdown_filename())
        }
    };
    if let Err(e) = markdown::write_digest(&digest, &markdown_path).await {
        error!(path = %markdown_path.display(), error = %e, "Failed writing Markdown");
        return Err(e.into());
    }
    info!(path = %markdown_path.display(), "Wrote digest Markdown");

    // ---- JSON output ----
    if let Some(dir) = &args.json_output_dir {
        match json::write_digest(&digest, dir).await {
            Ok(path) => info!(path = %path.display(), "Wrote digest JSON"),
            Err(e) => error!(error = %e, "Failed to write JSON digest"),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = stats.total,
        enriched = stats.enriched,
        fallbacks = stats.fallbacks,
        output = %markdown_path.display(),
        "Execution complete"
    );
    Ok(())
}

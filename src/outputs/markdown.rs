//! Markdown rendering of a [`Digest`].

use crate::error::OutputError;
use crate::models::Digest;
use crate::utils::upcase;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const NO_SUMMARY: &str = "_No summary available._";

/// Render the digest as a markdown document.
///
/// ```text
/// # Daily News Digest
///
/// _Morning edition, 2025-05-06_
///
/// ## [Rates held steady](https://news.example.com/rates)
/// <small>`example`</small>
///
/// The bank kept rates unchanged.
/// ```
pub fn digest_to_markdown(digest: &Digest) -> String {
    let mut md = String::new();
    writeln!(md, "# {}\n", digest.title).unwrap();
    writeln!(
        md,
        "_{} edition, {}_\n",
        upcase(&digest.edition),
        digest.local_date
    )
    .unwrap();

    if digest.entries.is_empty() {
        writeln!(md, "_No articles in this edition._").unwrap();
        return md;
    }

    for entry in &digest.entries {
        writeln!(md, "## [{}]({})", escape_brackets(&entry.title), entry.url).unwrap();
        if let Some(tag) = &entry.source_tag {
            writeln!(md, "<small>`{}`</small>", tag).unwrap();
        }
        md.push('\n');
        if entry.highlight.is_empty() {
            writeln!(md, "{}\n", NO_SUMMARY).unwrap();
        } else {
            writeln!(md, "{}\n", entry.highlight).unwrap();
        }
    }
    md
}

/// Write the rendered digest to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_digest(digest: &Digest, path: &Path) -> Result<(), OutputError> {
    let md = digest_to_markdown(digest);
    fs::write(path, md).await.map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(entries = digest.entries.len(), "Wrote digest Markdown");
    Ok(())
}

fn escape_brackets(title: &str) -> String {
    title.replace('[', "\\[").replace(']', "\\]")
}

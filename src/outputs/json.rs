//! JSON dump of a [`Digest`] for API consumers.
//!
//! # Output Structure
//!
//! Files are organized by date with edition names:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```

use crate::error::OutputError;
use crate::models::Digest;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `digest` to `{json_output_dir}/{date}/{edition}.json`.
///
/// Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_digest(digest: &Digest, json_output_dir: &Path) -> Result<PathBuf, OutputError> {
    let json = serde_json::to_string_pretty(digest)?;

    let full_json_dir = json_output_dir.join(&digest.local_date);
    info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(full_json_dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(OutputError::Io {
            path: full_json_dir,
            source: e,
        });
    }

    let output_json_filename = full_json_dir.join(format!("{}.json", digest.edition));
    fs::write(&output_json_filename, json)
        .await
        .map_err(|source| OutputError::Io {
            path: output_json_filename.clone(),
            source,
        })?;
    info!(path = %output_json_filename.display(), "Wrote JSON digest");

    Ok(output_json_filename)
}

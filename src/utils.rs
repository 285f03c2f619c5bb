//! Utility functions for edition naming, string formatting and output paths.

use crate::error::OutputError;
use chrono::{NaiveTime, Timelike};
use std::path::{Component, Path, PathBuf};

/// Classify a time of day into morning, afternoon, or evening.
///
/// - **Morning**: 00:00 - 08:00
/// - **Afternoon**: 08:00 - 16:00
/// - **Evening**: 16:00 - 24:00
pub fn edition_for(time: NaiveTime) -> &'static str {
    match time.hour() {
        0..8 => "morning",
        8..16 => "afternoon",
        _ => "evening",
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters and `"…(+N chars)"` is appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…(+{} chars)", &s[..idx], s[idx..].chars().count()),
    }
}

/// The first `max` characters of `s`.
pub fn char_prefix(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Capitalize the first character of a string ("morning" -> "Morning").
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Check that `output` lies inside the current working directory and make
/// sure its parent directory exists.
pub fn validate_output_path(output: &Path) -> Result<PathBuf, OutputError> {
    let cwd = std::env::current_dir().map_err(|source| OutputError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    validate_output_path_in(output, &cwd)
}

/// Like [`validate_output_path`], against an explicit project root.
///
/// `..` and `.` are resolved lexically first. The deepest ancestor that
/// already exists is then canonicalized, so symlinks along the way are
/// followed, and the components that do not exist yet are re-appended.
pub fn validate_output_path_in(output: &Path, root: &Path) -> Result<PathBuf, OutputError> {
    let root = root.canonicalize().map_err(|source| OutputError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let joined = if output.is_absolute() {
        output.to_path_buf()
    } else {
        root.join(output)
    };
    let resolved = resolve_existing_prefix(&normalize(&joined))?;

    if !resolved.starts_with(&root) || resolved == root {
        return Err(OutputError::OutsideProject {
            path: resolved,
            root,
        });
    }

    if let Some(parent) = resolved.parent() {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(resolved)
}

/// Canonicalize the longest existing prefix of `path` and append the rest.
///
/// A dangling symlink counts as existing, so canonicalizing it fails instead
/// of letting a later write follow it.
fn resolve_existing_prefix(path: &Path) -> Result<PathBuf, OutputError> {
    let mut existing = path.to_path_buf();
    let mut missing = Vec::new();
    while existing.symlink_metadata().is_err() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => break,
        }
    }

    let mut resolved = existing.canonicalize().map_err(|source| OutputError::Io {
        path: existing.clone(),
        source,
    })?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

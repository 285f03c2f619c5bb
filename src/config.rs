//! Runtime configuration loaded from `config.yaml`.
//!
//! Every field has a default, so a partial (or missing) file is valid:
//!
//! ```yaml
//! request_timeout: 10
//! max_content_chars: 4000
//! summary_sentence_count: 3
//! summary_fallback_words: 60
//! feeds:
//!   - https://example.com/rss.xml
//! retry:
//!   retry_client_errors: false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for the digest pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Per-attempt HTTP timeout, in seconds.
    pub request_timeout: u64,
    /// Hard cap on scraped article text, in characters.
    pub max_content_chars: usize,
    /// Number of sentences kept in each highlight.
    pub summary_sentence_count: usize,
    /// Number of leading words used when no sentence could be extracted.
    pub summary_fallback_words: usize,
    /// Heading of the rendered digest.
    pub digest_title: String,
    /// Directory the markdown digest is written to.
    pub digest_dir: PathBuf,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// RSS or Atom feeds to pull articles from.
    pub feeds: Vec<String>,
    pub retry: RetrySettings,
}

/// Backoff parameters for the fetcher.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: usize,
    pub multiplier: u64,
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
    /// Retry 4xx responses like any other failure.
    pub retry_client_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout: 10,
            max_content_chars: 4000,
            summary_sentence_count: 3,
            summary_fallback_words: 60,
            digest_title: "Daily News Digest".to_string(),
            digest_dir: PathBuf::from("digests"),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            feeds: Vec::new(),
            retry: RetrySettings::default(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: 1,
            min_delay_secs: 1,
            max_delay_secs: 10,
            retry_client_errors: false,
        }
    }
}

impl Config {
    /// Load and validate a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw)?;
        info!(feeds = config.feeds.len(), "Loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, else `config.yaml` when it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None if Path::new("config.yaml").exists() => Self::load("config.yaml"),
            None => {
                debug!("No config file found; using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a struct.
        let config: Config = if raw.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(raw)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject zero values in numeric fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, u64); 8] = [
            ("request_timeout", self.request_timeout),
            ("max_content_chars", self.max_content_chars as u64),
            ("summary_sentence_count", self.summary_sentence_count as u64),
            ("summary_fallback_words", self.summary_fallback_words as u64),
            ("retry.max_attempts", self.retry.max_attempts as u64),
            ("retry.multiplier", self.retry.multiplier),
            ("retry.min_delay_secs", self.retry.min_delay_secs),
            ("retry.max_delay_secs", self.retry.max_delay_secs),
        ];
        match checks.iter().find(|(_, value)| *value == 0) {
            Some(&(field, _)) => Err(ConfigError::NonPositive { field }),
            None => Ok(()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.max_delay_secs, 10);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config =
            Config::from_yaml("max_content_chars: 1200\nfeeds:\n  - https://example.com/rss\n")
                .unwrap();
        assert_eq!(config.max_content_chars, 1200);
        assert_eq!(config.summary_sentence_count, 3);
        assert_eq!(config.feeds, vec!["https://example.com/rss".to_string()]);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_zero_rejected() {
        let err = Config::from_yaml("summary_fallback_words: 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                field: "summary_fallback_words"
            }
        ));

        let err = Config::from_yaml("retry:\n  max_attempts: 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                field: "retry.max_attempts"
            }
        ));
    }

    #[test]
    fn test_negative_is_a_yaml_error() {
        let err = Config::from_yaml("request_timeout: -5").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout: 3\ndigest_title: Morning Brief").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.digest_title, "Morning Brief");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

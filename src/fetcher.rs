//! HTTP page fetching with exponential backoff retry logic.
//!
//! # Architecture
//!
//! - [`Fetch`]: core trait, "GET this URL and give me the page"
//! - [`HttpFetcher`]: `reqwest`-backed implementation with a per-request timeout
//! - [`RetryFetch`]: decorator that adds retries to any [`Fetch`] implementation,
//!   driven by a [`RetryPolicy`]
//!
//! # Retry Strategy
//!
//! - At most 3 attempts in total
//! - Wait after failed attempt `n` is `multiplier * 2^(n-1)`, clamped to
//!   `[min_delay, max_delay]` (1s, 2s, 4s, ... capped at 10s)
//! - Timeouts, connection errors and 5xx responses are retried
//! - 4xx responses are permanent, except 408 and 429, unless the policy is
//!   told to retry client errors too

use crate::config::{Config, RetrySettings};
use crate::error::FetchError;
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Trait for fetching a single URL.
///
/// Implementors return the page body, or a [`FetchError`] once the response
/// has been validated (error statuses are errors).
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// Plain HTTP GET using a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        debug!(status = status.as_u16(), bytes = body.len(), "Fetched page");
        Ok(Page {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

/// How many times to try, how long to wait, and which errors are worth it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: usize,
    pub multiplier: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub retry_client_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            multiplier: Duration::from_secs(settings.multiplier),
            min_delay: Duration::from_secs(settings.min_delay_secs),
            max_delay: Duration::from_secs(settings.max_delay_secs),
            retry_client_errors: settings.retry_client_errors,
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exp = attempt.saturating_sub(1).min(31) as u32;
        let delay = self.multiplier.saturating_mul(1u32 << exp);
        delay.clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }

    pub fn is_retryable(&self, err: &FetchError) -> bool {
        match err {
            FetchError::Timeout { .. } | FetchError::Request { .. } | FetchError::Body { .. } => {
                true
            }
            FetchError::Status { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429 || self.retry_client_errors
            }
            FetchError::InvalidUrl { .. } => false,
        }
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`Fetch`] implementation.
pub struct RetryFetch<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> RetryFetch<T>
where
    T: Fetch,
{
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T> Fetch for RetryFetch<T>
where
    T: Fetch,
{
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.fetch(url).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if !self.policy.is_retryable(&e) {
                        debug!(attempt, error = %e, "fetch() failed with a permanent error");
                        return Err(e);
                    }

                    if attempt >= self.policy.max_attempts {
                        error!(
                            attempt,
                            max = self.policy.max_attempts,
                            elapsed_ms_attempt = attempt_dt.as_millis(),
                            elapsed_ms_total = total_dt.as_millis(),
                            error = %e,
                            "fetch() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        attempt,
                        max = self.policy.max_attempts,
                        elapsed_ms_attempt = attempt_dt.as_millis(),
                        elapsed_ms_total = total_dt.as_millis(),
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Build the retrying HTTP fetcher described by `config`.
pub fn build_fetcher(config: &Config) -> Result<RetryFetch<HttpFetcher>, reqwest::Error> {
    let http = HttpFetcher::new(config.request_timeout(), &config.user_agent)?;
    Ok(RetryFetch::new(http, RetryPolicy::from(&config.retry)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            multiplier: Duration::from_millis(1),
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            retry_client_errors: false,
        }
    }

    fn fetcher(policy: RetryPolicy) -> RetryFetch<HttpFetcher> {
        let http = HttpFetcher::new(Duration::from_secs(5), "news_digest-test").unwrap();
        RetryFetch::new(http, policy)
    }

    #[test]
    fn test_default_backoff_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(8));
        assert_eq!(policy.delay_for(5), Duration::from_secs(10));
        assert_eq!(policy.delay_for(40), Duration::from_secs(10));
    }

    #[test]
    fn test_status_classification() {
        let policy = RetryPolicy::default();
        let status = |status| FetchError::Status {
            url: "https://example.com".to_string(),
            status,
        };
        assert!(policy.is_retryable(&status(500)));
        assert!(policy.is_retryable(&status(503)));
        assert!(policy.is_retryable(&status(429)));
        assert!(policy.is_retryable(&status(408)));
        assert!(!policy.is_retryable(&status(404)));
        assert!(!policy.is_retryable(&status(403)));
        assert!(policy.is_retryable(&FetchError::Timeout {
            url: "https://example.com".to_string()
        }));

        let lenient = RetryPolicy {
            retry_client_errors: true,
            ..RetryPolicy::default()
        };
        assert!(lenient.is_retryable(&status(404)));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/story"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Hi</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/story", server.uri());
        let page = fetcher(fast_policy()).fetch(&url).await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<p>Hi</p>");
        assert_eq!(page.url, url);
    }

    #[tokio::test]
    async fn test_retries_server_error_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let page = fetcher(fast_policy())
            .fetch(&format!("{}/flaky", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.body, "ok");
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = fetcher(fast_policy())
            .fetch(&format!("{}/down", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = fetcher(fast_policy())
            .fetch(&format!("{}/gone", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_not_found_retried_when_client_errors_enabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(3)
            .mount(&server)
            .await;

        let policy = RetryPolicy {
            retry_client_errors: true,
            ..fast_policy()
        };
        let err = fetcher(policy)
            .fetch(&format!("{}/gone", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_timeout_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .expect(3)
            .mount(&server)
            .await;

        let http = HttpFetcher::new(Duration::from_millis(50), "news_digest-test").unwrap();
        let err = RetryFetch::new(http, fast_policy())
            .fetch(&format!("{}/slow", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_once() {
        let err = fetcher(fast_policy()).fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}

//! HTTP client with retry and rate limiting
//!
//! Sends signed Query API requests:
//! - Form-encoded POST bodies
//! - SigV4 signing of every attempt
//! - Automatic retries with configurable backoff
//! - Client-side rate limiting to stay under service throttling
//! - AWS error documents turned into typed errors

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{uri_encode, SigV4Signer};
use crate::config::HttpConfig;
use crate::decode::parse_error_response;
use crate::error::{Error, Result};
use crate::types::{BackoffType, QueryParams};
use chrono::Utc;
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Content type of Query API request bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Configuration for the HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(20),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("rdsctl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&HttpConfig> for HttpClientConfig {
    fn from(config: &HttpConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_seconds),
            connect_timeout: Duration::from_secs(config.connect_timeout_seconds),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.retry_backoff.initial_ms),
            max_backoff: Duration::from_millis(config.retry_backoff.max_ms),
            backoff_type: config.retry_backoff.backoff_type,
            rate_limit: RateLimiterConfig::from_config(&config.rate_limit),
            ..Self::default()
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Outcome of a single request attempt
enum Attempt {
    Success(String),
    Failed {
        error: Error,
        retry_after: Option<Duration>,
    },
}

impl Attempt {
    fn failed(error: Error, retry_after: Option<Duration>) -> Self {
        Self::Failed { error, retry_after }
    }
}

/// HTTP client with signing, retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    signer: Option<SigV4Signer>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            signer: None,
            rate_limiter,
        })
    }

    /// Sign every request with `signer`
    #[must_use]
    pub fn with_signer(mut self, signer: SigV4Signer) -> Self {
        self.signer = Some(signer);
        self
    }

    /// POST form parameters and return the body of a successful response
    ///
    /// Throttling, server errors, timeouts and connection failures are
    /// retried with backoff; other failures are returned immediately.
    pub async fn post_form(&self, url: &Url, params: &QueryParams) -> Result<String> {
        let body = encode_form(params);
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let (error, retry_after) = match self.send_once(url, &body).await? {
                Attempt::Success(text) => {
                    debug!("Request succeeded: POST {url}");
                    return Ok(text);
                }
                Attempt::Failed { error, retry_after } => (error, retry_after),
            };

            if !error.is_retryable() || attempt >= max_retries {
                if attempt > 0 && error.is_retryable() {
                    warn!("Giving up after {} attempts: {error}", attempt + 1);
                }
                return Err(error);
            }

            let delay = retry_after.map_or_else(
                || self.calculate_backoff(attempt),
                |d| d.min(self.config.max_backoff),
            );
            warn!(
                "Request failed ({error}), attempt {}/{}, retrying in {delay:?}",
                attempt + 1,
                max_retries + 1
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// One signed attempt; errors here mean the request could not be built
    async fn send_once(&self, url: &Url, body: &str) -> Result<Attempt> {
        let mut request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body.to_string())
            .build()?;

        if let Some(ref signer) = self.signer {
            signer.sign(&mut request, Utc::now())?;
        }

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                let timeout_ms = self.config.timeout.as_millis() as u64;
                return Ok(Attempt::failed(Error::Timeout { timeout_ms }, None));
            }
            Err(e) => return Ok(Attempt::failed(Error::Http(e), None)),
        };

        let status = response.status();
        let retry_after = extract_retry_after(response.headers());
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Ok(Attempt::failed(Error::Http(e), None)),
        };

        if status.is_success() {
            Ok(Attempt::Success(text))
        } else {
            let error = parse_error_response(status.as_u16(), &text);
            Ok(Attempt::failed(error, retry_after))
        }
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => {
                let factor = attempt.saturating_add(1);
                self.config.initial_backoff.saturating_mul(factor)
            }
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Encode parameters as a form body, sorted by name
pub fn encode_form(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Extract a `Retry-After` delay given in seconds
fn extract_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .map(Duration::from_secs)
}

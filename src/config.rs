//! Client configuration
//!
//! `ClientConfig` is built once at startup and passed down explicitly.
//! Values are layered: built-in defaults, then an optional YAML (or JSON)
//! file, then the standard AWS environment variables, then command-line
//! flags.

use crate::auth::CredentialsConfig;
use crate::error::{Error, Result};
use crate::pagination::PageSizeBounds;
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// Region environment variable, checked first
pub const ENV_REGION: &str = "AWS_REGION";
/// Fallback region environment variable
pub const ENV_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
/// Endpoint override environment variable
pub const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// AWS region (e.g., "us-east-1")
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint override (e.g., a LocalStack URL)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Credential source
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Page size bounds for list operations
    #[serde(default)]
    pub paging: PagingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint_url: None,
            credentials: CredentialsConfig::default(),
            http: HttpConfig::default(),
            paging: PagingConfig::default(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl ClientConfig {
    /// Resolve the full configuration
    ///
    /// Reads `path` if given, overlays the process environment and then the
    /// explicit overrides, and validates the result.
    pub fn load(
        path: Option<&Path>,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.apply_overrides(region, endpoint_url);
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse from a YAML string; JSON documents parse as YAML too
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overlay region and endpoint from environment variables read via `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).none_if_empty();
        if let Some(region) = get(ENV_REGION).or_else(|| get(ENV_DEFAULT_REGION)) {
            self.region = region;
        }
        if let Some(endpoint) = get(ENV_ENDPOINT_URL) {
            self.endpoint_url = Some(endpoint);
        }
    }

    /// Overlay explicit values (command-line flags)
    pub fn apply_overrides(&mut self, region: Option<String>, endpoint_url: Option<String>) {
        if let Some(region) = region {
            self.region = region;
        }
        if let Some(endpoint) = endpoint_url {
            self.endpoint_url = Some(endpoint);
        }
    }

    /// Check the configuration for values no request could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(Error::missing_field("region"));
        }
        if let Some(endpoint) = &self.endpoint_url {
            Url::parse(endpoint)
                .map_err(|e| Error::invalid_value("endpoint_url", e.to_string()))?;
        }
        self.paging.validate()?;
        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "http.timeout_seconds",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Service endpoint: the override if set, else the regional RDS endpoint
    pub fn endpoint(&self) -> Result<Url> {
        let url = match &self.endpoint_url {
            Some(endpoint) => Url::parse(endpoint)?,
            None => Url::parse(&format!("https://rds.{}.amazonaws.com/", self.region))?,
        };
        Ok(url)
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            max_retries: default_max_retries(),
            retry_backoff: BackoffConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    20_000
}

/// Rate limiting configuration; zero requests per second disables it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per second limit
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    /// Requests allowed in a burst
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_rps(),
            burst_size: default_burst(),
        }
    }
}

fn default_rps() -> u32 {
    10
}

fn default_burst() -> u32 {
    10
}

// ============================================================================
// Paging Config
// ============================================================================

/// Page size bounds for list operations
///
/// RDS accepts `MaxRecords` between 20 and 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Smallest page size the service accepts
    #[serde(default = "default_min_page_size")]
    pub min_page_size: u32,

    /// The service's natural page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            min_page_size: default_min_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_min_page_size() -> u32 {
    crate::rds::MIN_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    crate::rds::MAX_PAGE_SIZE
}

impl PagingConfig {
    /// Reject zero or inverted bounds
    pub fn validate(&self) -> Result<()> {
        if self.min_page_size == 0 {
            return Err(Error::invalid_value(
                "paging.min_page_size",
                "must be greater than zero",
            ));
        }
        if self.max_page_size == 0 {
            return Err(Error::invalid_value(
                "paging.max_page_size",
                "must be greater than zero",
            ));
        }
        if self.min_page_size > self.max_page_size {
            return Err(Error::invalid_value(
                "paging.min_page_size",
                format!(
                    "{} exceeds max_page_size {}",
                    self.min_page_size, self.max_page_size
                ),
            ));
        }
        Ok(())
    }

    /// Bounds handed to the pagination executor
    pub fn bounds(&self) -> PageSizeBounds {
        PageSizeBounds::new(self.min_page_size, self.max_page_size)
    }
}

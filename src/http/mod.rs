//! HTTP client module
//!
//! Provides the transport for Query API calls.
//!
//! # Features
//!
//! - **Signing**: every attempt is signed with SigV4
//! - **Automatic Retries**: throttling, 5xx, timeouts and connection errors
//! - **Rate Limiting**: token bucket rate limiter using governor
//! - **Backoff Strategies**: constant, linear, and exponential backoff

mod client;
mod rate_limit;

pub use client::{encode_form, HttpClient, HttpClientConfig, FORM_CONTENT_TYPE};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;

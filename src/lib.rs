// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # rdsctl
//!
//! An Amazon RDS client built around one paginated list executor.
//!
//! ## Features
//!
//! - **Bounded Auto-Pagination**: follow `Marker` cursors with an optional
//!   item budget, single-page mode and a partial-result failure policy
//! - **SigV4 Signing**: static or environment credentials
//! - **Retries and Rate Limiting**: backoff on throttling and 5xx, token
//!   bucket limiter
//! - **Output Selection**: result member, whole response, bound parameter,
//!   JSONPath or dotted path
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rdsctl::config::ClientConfig;
//! use rdsctl::pagination::PageOptions;
//! use rdsctl::rds::{DescribeDbInstances, RdsClient};
//!
//! #[tokio::main]
//! async fn main() -> rdsctl::Result<()> {
//!     let config = ClientConfig::load(None, Some("eu-west-1".into()), None)?;
//!     let client = RdsClient::from_config(&config)?;
//!
//!     let options = PageOptions::new().max_items(50);
//!     let instances = client
//!         .list(&DescribeDbInstances::default(), &options, Vec::new())
//!         .await?;
//!     for instance in instances {
//!         println!("{}", instance.db_instance_identifier);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        CLI / Runner                             │
//! │  describe-* → PaginatedListExecutor    others → single call     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │  Decode   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ SigV4    │ Form POST │ Marker        │ XML       │ Select      │
//! │ Env/Static│ Retry    │ Budget        │ Envelope  │ JSON        │
//! │          │ Rate Limit│ Single page   │ Errors    │ Pretty      │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials and SigV4 signing
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Paginated list executor
pub mod pagination;

/// Query API response decoding
pub mod decode;

/// Response selection and output
pub mod output;

/// Client configuration
pub mod config;

/// RDS operations and client
pub mod rds;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use pagination::{PageFetcher, PageOptions, PaginatedListExecutor};
pub use rds::RdsClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

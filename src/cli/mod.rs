//! CLI module
//!
//! Command-line interface for RDS operations.
//!
//! # Commands
//!
//! - `describe-db-instances`, `describe-db-clusters`, `describe-db-snapshots`,
//!   `describe-db-cluster-snapshots`, `describe-db-proxies` - paginated
//!   listings (`--marker`, `--max-records`, `--no-auto-iteration`, `--filter`)
//! - `copy-db-cluster-snapshot` - copy a cluster snapshot
//! - `create-db-proxy` - create a proxy
//! - `restore-db-instance-to-point-in-time` - point-in-time restore

mod commands;
mod runner;

pub use commands::{Cli, Commands, Invocation, PagingArgs};
pub use runner::Runner;

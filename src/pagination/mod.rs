//! Pagination module
//!
//! # Overview
//!
//! Every listing operation shares one protocol: fetch a page, hand it to the
//! consumer, follow the opaque continuation cursor until it runs out, the
//! item budget is spent, or the caller asked for a single page. The
//! [`PaginatedListExecutor`] implements that loop once; each operation only
//! supplies a [`PageFetcher`].
//!
//! Failure policy: a failed fetch is surfaced unless a budget is set and
//! items were already emitted, in which case the run stops and returns what
//! it has.

mod executor;
mod types;

pub use executor::PaginatedListExecutor;
pub use types::{
    ExecutorPhase, Filter, FnFetcher, ListRequest, ListResponse, PageFetcher, PageOptions,
    PageSizeBounds, PaginationState, RunSummary,
};

#[cfg(test)]
mod tests;

//! Pagination types and traits
//!
//! Defines the request/response shapes exchanged with a page fetcher and the
//! per-run state the executor keeps while following cursors.

use crate::error::Result;
use crate::types::OptionStringExt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A single filter predicate, passed through to the service unchanged
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Filter name (e.g. "engine")
    pub name: String,
    /// Accepted values
    pub values: Vec<String>,
}

impl Filter {
    /// Create a new filter
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// One outbound call to a listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Opaque continuation token; `None` starts from the beginning
    pub cursor: Option<String>,
    /// Requested upper bound on items in this page
    pub page_size_hint: Option<u32>,
    /// Filter predicates
    pub filters: Vec<Filter>,
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse<T> {
    /// Records in server order
    pub items: Vec<T>,
    /// Cursor for the next page; absent or empty when exhausted
    pub next_cursor: Option<String>,
}

impl<T> ListResponse<T> {
    /// Create a page
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Create the final page of a listing
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// Whether the server reported a further page
    pub fn has_next(&self) -> bool {
        self.next_cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Fetches one page from a remote listing endpoint
///
/// Implementations own transport concerns (signing, retries, throttling).
/// Calling `fetch_page` twice with the same cursor must yield an equivalent
/// page; the executor does not deduplicate.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Record type of each page
    type Item: Send;

    /// Fetch the page addressed by `request`
    async fn fetch_page(&self, request: &ListRequest) -> Result<ListResponse<Self::Item>>;
}

/// Adapts an async closure into a [`PageFetcher`]
pub struct FnFetcher<F> {
    f: F,
}

impl<F> FnFetcher<F> {
    /// Wrap a closure taking an owned [`ListRequest`]
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut, T> PageFetcher for FnFetcher<F>
where
    F: Fn(ListRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ListResponse<T>>> + Send,
    T: Send,
{
    type Item = T;

    async fn fetch_page(&self, request: &ListRequest) -> Result<ListResponse<T>> {
        (self.f)(request.clone()).await
    }
}

/// Bounds on the page size the service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizeBounds {
    /// Smallest page size the service accepts
    pub min: u32,
    /// The service's natural (and largest) page size
    pub max: u32,
}

impl PageSizeBounds {
    /// Create bounds, swapping them if given in the wrong order
    pub fn new(min: u32, max: u32) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// Page size hint for a remaining budget
    ///
    /// No budget means no hint; the server picks its default.
    pub fn hint_for(&self, remaining: Option<i64>) -> Option<u32> {
        let remaining = remaining?;
        let wanted = remaining.clamp(0, i64::from(self.max)) as u32;
        Some(wanted.clamp(self.min, self.max))
    }
}

impl Default for PageSizeBounds {
    fn default() -> Self {
        Self { min: 1, max: 100 }
    }
}

/// Caller-facing paging controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Explicit starting cursor; supplying one disables auto-iteration
    pub initial_cursor: Option<String>,
    /// Upper bound on total items across pages
    pub max_items: Option<i64>,
    /// Fetch exactly one page
    pub single_page_only: bool,
}

impl PageOptions {
    /// Auto-iterate to exhaustion
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting cursor
    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.initial_cursor = Some(cursor.into());
        self
    }

    /// Set the item budget
    #[must_use]
    pub fn max_items(mut self, max_items: i64) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Fetch one page only
    #[must_use]
    pub fn single_page(mut self) -> Self {
        self.single_page_only = true;
        self
    }

    /// Whether the caller, not the executor, drives paging
    pub fn user_controls_paging(&self) -> bool {
        self.single_page_only || self.initial_cursor.is_some()
    }
}

/// Phase of a single executor run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorPhase {
    /// Before the first fetch
    Idle,
    /// A fetch is in flight
    Fetching,
    /// A page is being handed to the consumer
    Emitting,
    /// Finished; pages emitted so far are the result
    StoppedSuccess,
    /// Finished with a surfaced error
    StoppedError,
}

impl ExecutorPhase {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::StoppedSuccess | Self::StoppedError)
    }
}

/// Tracks pagination state during one run
#[derive(Debug, Clone)]
pub struct PaginationState {
    /// Cursor for the next fetch
    pub(crate) current_cursor: Option<String>,
    /// Items still wanted; `None` means unbounded
    pub(crate) remaining_budget: Option<i64>,
    /// Items handed to the consumer so far
    pub(crate) items_emitted: usize,
    /// Pages handed to the consumer so far
    pub(crate) pages_emitted: u32,
    /// Fixed at start: the caller supplied a cursor or asked for one page
    pub(crate) user_controls_paging: bool,
    phase: ExecutorPhase,
}

impl PaginationState {
    /// Create the state for a new run
    pub(crate) fn new(options: &PageOptions) -> Self {
        Self {
            current_cursor: options.initial_cursor.clone().none_if_empty(),
            remaining_budget: options.max_items,
            items_emitted: 0,
            pages_emitted: 0,
            user_controls_paging: options.user_controls_paging(),
            phase: ExecutorPhase::Idle,
        }
    }

    /// Current phase
    pub fn phase(&self) -> ExecutorPhase {
        self.phase
    }

    /// Enter `Fetching`
    pub(crate) fn begin_fetch(&mut self) {
        debug_assert!(matches!(
            self.phase,
            ExecutorPhase::Idle | ExecutorPhase::Emitting
        ));
        self.phase = ExecutorPhase::Fetching;
    }

    /// Enter `Emitting` after a successful fetch
    pub(crate) fn begin_emit(&mut self) {
        debug_assert_eq!(self.phase, ExecutorPhase::Fetching);
        self.phase = ExecutorPhase::Emitting;
    }

    /// Account for an emitted page
    pub(crate) fn record_page(&mut self, item_count: usize, next_cursor: Option<String>) {
        self.items_emitted += item_count;
        self.pages_emitted += 1;
        if let Some(remaining) = self.remaining_budget.as_mut() {
            *remaining -= item_count as i64;
        }
        self.current_cursor = next_cursor.none_if_empty();
    }

    /// Whether a failed fetch ends the run with an error
    ///
    /// Only a bounded listing that already produced items tolerates a
    /// failure; everything else surfaces it.
    pub fn failure_is_fatal(&self) -> bool {
        self.items_emitted == 0 || self.remaining_budget.is_none()
    }

    /// Whether another fetch should follow the page just emitted
    pub fn should_continue(&self) -> bool {
        !self.user_controls_paging
            && self.current_cursor.is_some()
            && self.remaining_budget.map_or(true, |r| r >= 1)
    }

    /// Enter `StoppedSuccess`
    pub(crate) fn finish(&mut self) {
        self.phase = ExecutorPhase::StoppedSuccess;
    }

    /// Enter `StoppedError`
    pub(crate) fn fail(&mut self) {
        self.phase = ExecutorPhase::StoppedError;
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages handed to the consumer
    pub pages: u32,
    /// Items handed to the consumer
    pub items: usize,
    /// Last cursor returned by the service, if any
    pub next_cursor: Option<String>,
}

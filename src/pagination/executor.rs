//! Paginated list executor
//!
//! Drives a [`PageFetcher`] across continuation cursors, honoring an optional
//! item budget, and hands each page to a consumer in fetch order.

use super::types::{
    Filter, ListRequest, ListResponse, PageFetcher, PageOptions, PageSizeBounds,
    PaginationState, RunSummary,
};
use crate::error::{Error, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Follows continuation cursors for one listing operation at a time
///
/// Exactly one fetch is in flight at any moment: a page is fetched, handed
/// to the consumer, and only then is the next fetch considered.
#[derive(Debug, Clone, Default)]
pub struct PaginatedListExecutor {
    bounds: PageSizeBounds,
    filters: Vec<Filter>,
    cancel: Option<CancellationToken>,
}

impl PaginatedListExecutor {
    /// Create an executor with default page size bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size bounds the service accepts
    #[must_use]
    pub fn with_bounds(mut self, bounds: PageSizeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set filters passed to every fetch
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    /// Stop before the next fetch once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Page size bounds in use
    pub fn bounds(&self) -> PageSizeBounds {
        self.bounds
    }

    /// Run a listing to completion
    ///
    /// `on_page` is called once per fetched page, in order. A failed fetch
    /// is returned unless a budget is set and items were already emitted, in
    /// which case the pages emitted so far stand as the result.
    pub async fn run<F, C>(
        &self,
        options: &PageOptions,
        fetcher: &F,
        mut on_page: C,
    ) -> Result<RunSummary>
    where
        F: PageFetcher + ?Sized,
        C: FnMut(ListResponse<F::Item>),
    {
        if let Some(max_items) = options.max_items {
            if max_items < 0 {
                return Err(Error::InvalidBudget { max_items });
            }
            if max_items == 0 {
                debug!("Item budget is zero, nothing to fetch");
                return Ok(RunSummary::default());
            }
        }

        let mut state = PaginationState::new(options);

        loop {
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                state.fail();
                return Err(Error::Cancelled);
            }

            state.begin_fetch();
            let request = ListRequest {
                cursor: state.current_cursor.clone(),
                page_size_hint: self.bounds.hint_for(state.remaining_budget),
                filters: self.filters.clone(),
            };
            let page_number = state.pages_emitted + 1;

            match fetcher.fetch_page(&request).await {
                Ok(page) => {
                    state.begin_emit();
                    let item_count = page.items.len();
                    let next_cursor = page.next_cursor.clone();
                    debug!(
                        "Page {page_number}: {item_count} items, more: {}",
                        page.has_next()
                    );
                    on_page(page);
                    state.record_page(item_count, next_cursor);
                }
                Err(e) => {
                    if state.failure_is_fatal() {
                        state.fail();
                        return Err(Error::fetch(page_number, e));
                    }
                    warn!(
                        "Stopping after {} items: fetching page {page_number} failed: {e}",
                        state.items_emitted
                    );
                    state.finish();
                    break;
                }
            }

            if !state.should_continue() {
                state.finish();
                break;
            }
        }

        Ok(RunSummary {
            pages: state.pages_emitted,
            items: state.items_emitted,
            next_cursor: state.current_cursor,
        })
    }

    /// Run a listing and collect every item
    pub async fn collect<F>(&self, options: &PageOptions, fetcher: &F) -> Result<Vec<F::Item>>
    where
        F: PageFetcher + ?Sized,
    {
        let mut items = Vec::new();
        self.run(options, fetcher, |page| items.extend(page.items))
            .await?;
        Ok(items)
    }
}

//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::Mutex;
use test_case::test_case;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Helpers
// ============================================================================

/// Replays a fixed sequence of page results and records every request
struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<ListResponse<&'static str>>>>,
    requests: Mutex<Vec<ListRequest>>,
}

impl ScriptedFetcher {
    fn new(script: Vec<Result<ListResponse<&'static str>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    type Item = &'static str;

    async fn fetch_page(&self, request: &ListRequest) -> Result<ListResponse<&'static str>> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other("fetched past the end of the script".into())))
    }
}

fn page(items: &[&'static str], next: &str) -> Result<ListResponse<&'static str>> {
    Ok(ListResponse::new(items.to_vec(), Some(next.to_string())))
}

fn last(items: &[&'static str]) -> Result<ListResponse<&'static str>> {
    Ok(ListResponse::last(items.to_vec()))
}

fn failure() -> Result<ListResponse<&'static str>> {
    Err(Error::api("Throttling", "Rate exceeded", 400))
}

async fn run_collecting(
    executor: &PaginatedListExecutor,
    options: &PageOptions,
    fetcher: &ScriptedFetcher,
) -> (Result<RunSummary>, Vec<Vec<&'static str>>) {
    let mut pages = Vec::new();
    let result = executor
        .run(options, fetcher, |p| pages.push(p.items))
        .await;
    (result, pages)
}

// ============================================================================
// Cursor following
// ============================================================================

#[tokio::test]
async fn test_follows_cursor_until_exhausted() {
    let fetcher = ScriptedFetcher::new(vec![page(&["a", "b", "c"], "x1"), last(&["d", "e"])]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) = run_collecting(&executor, &PageOptions::new(), &fetcher).await;

    let summary = result.unwrap();
    assert_eq!(pages, vec![vec!["a", "b", "c"], vec!["d", "e"]]);
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.items, 5);
    assert_eq!(summary.next_cursor, None);

    let requests = fetcher.requests();
    assert_eq!(requests[0].cursor, None);
    assert_eq!(requests[1].cursor, Some("x1".to_string()));
    assert!(requests.iter().all(|r| r.page_size_hint.is_none()));
}

#[tokio::test]
async fn test_empty_next_cursor_ends_iteration() {
    let fetcher = ScriptedFetcher::new(vec![
        page(&["a"], "x1"),
        page(&["b"], "x2"),
        page(&["c"], ""),
    ]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) = run_collecting(&executor, &PageOptions::new(), &fetcher).await;

    assert!(result.is_ok());
    assert_eq!(pages, vec![vec!["a"], vec!["b"], vec!["c"]]);
    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn test_empty_pages_with_cursor_keep_iterating() {
    let fetcher = ScriptedFetcher::new(vec![page(&[], "x1"), page(&[], "x2"), last(&["a"])]);
    let executor = PaginatedListExecutor::new();

    let items = executor
        .collect(&PageOptions::new(), &fetcher)
        .await
        .unwrap();

    assert_eq!(items, vec!["a"]);
    assert_eq!(fetcher.calls(), 3);
}

// ============================================================================
// Budget
// ============================================================================

#[tokio::test]
async fn test_budget_stops_after_crossing_page() {
    let fetcher = ScriptedFetcher::new(vec![
        page(&["a", "b", "c"], "x1"),
        page(&["d", "e", "f"], "x2"),
        page(&["g", "h", "i"], "x3"),
    ]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().max_items(5), &fetcher).await;

    let summary = result.unwrap();
    // The crossing page is emitted whole, never split
    assert_eq!(pages, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    assert_eq!(summary.items, 6);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_budget_exhausted_exactly_ends_after_page() {
    let fetcher = ScriptedFetcher::new(vec![page(&["a", "b"], "x1"), page(&["c", "d"], "x2")]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().max_items(4), &fetcher).await;

    assert!(result.is_ok());
    assert_eq!(pages.len(), 2);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_short_pages_do_not_end_bounded_listing() {
    let fetcher = ScriptedFetcher::new(vec![
        page(&["a", "b"], "x1"),
        page(&["c", "d"], "x2"),
        page(&["e"], "x3"),
        last(&["f"]),
    ]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().max_items(10), &fetcher).await;

    assert!(result.is_ok());
    assert_eq!(pages.len(), 4);
    let hints: Vec<_> = fetcher
        .requests()
        .iter()
        .map(|r| r.page_size_hint)
        .collect();
    assert_eq!(hints, vec![Some(10), Some(8), Some(6), Some(5)]);
}

#[tokio::test]
async fn test_zero_budget_fetches_nothing() {
    let fetcher = ScriptedFetcher::new(vec![page(&["a"], "x1")]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().max_items(0), &fetcher).await;

    assert_eq!(result.unwrap(), RunSummary::default());
    assert!(pages.is_empty());
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_negative_budget_is_rejected_before_fetching() {
    let fetcher = ScriptedFetcher::new(vec![page(&["a"], "x1")]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().max_items(-3), &fetcher).await;

    assert!(matches!(result, Err(Error::InvalidBudget { max_items: -3 })));
    assert!(pages.is_empty());
    assert_eq!(fetcher.calls(), 0);
}

#[test_case(None, None ; "no budget gives no hint")]
#[test_case(Some(5), Some(20) ; "raised to service minimum")]
#[test_case(Some(50), Some(50) ; "budget within bounds")]
#[test_case(Some(100), Some(100) ; "budget at maximum")]
#[test_case(Some(1000), Some(100) ; "capped at natural page size")]
fn test_page_size_hint(remaining: Option<i64>, expected: Option<u32>) {
    let bounds = PageSizeBounds::new(20, 100);
    assert_eq!(bounds.hint_for(remaining), expected);
}

#[test]
fn test_page_size_bounds_are_ordered() {
    let bounds = PageSizeBounds::new(100, 20);
    assert_eq!(bounds.min, 20);
    assert_eq!(bounds.max, 100);
}

#[tokio::test]
async fn test_minimum_page_size_may_overshoot_budget() {
    let fetcher = ScriptedFetcher::new(vec![
        page(&["a", "b", "c", "d", "e", "f", "g", "h"], "x1"),
        page(&["i"], "x2"),
    ]);
    let executor = PaginatedListExecutor::new().with_bounds(PageSizeBounds::new(8, 100));

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().max_items(3), &fetcher).await;

    assert!(result.is_ok());
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].len(), 8);
    assert_eq!(fetcher.requests()[0].page_size_hint, Some(8));
}

// ============================================================================
// Caller-controlled paging
// ============================================================================

#[tokio::test]
async fn test_single_page_mode_fetches_once() {
    let fetcher = ScriptedFetcher::new(vec![page(&["a", "b"], "x1"), last(&["c"])]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().single_page(), &fetcher).await;

    let summary = result.unwrap();
    assert_eq!(pages, vec![vec!["a", "b"]]);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(summary.next_cursor, Some("x1".to_string()));
}

#[tokio::test]
async fn test_explicit_cursor_fetches_once_from_cursor() {
    let fetcher = ScriptedFetcher::new(vec![page(&["c"], "x2"), last(&["d"])]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().cursor("x1"), &fetcher).await;

    assert_eq!(result.unwrap().next_cursor, Some("x2".to_string()));
    assert_eq!(pages, vec![vec!["c"]]);
    assert_eq!(fetcher.requests()[0].cursor, Some("x1".to_string()));
}

#[test]
fn test_user_controls_paging() {
    assert!(!PageOptions::new().user_controls_paging());
    assert!(!PageOptions::new().max_items(10).user_controls_paging());
    assert!(PageOptions::new().single_page().user_controls_paging());
    assert!(PageOptions::new().cursor("").user_controls_paging());
}

// ============================================================================
// Failure policy
// ============================================================================

#[tokio::test]
async fn test_first_fetch_failure_is_fatal() {
    let fetcher = ScriptedFetcher::new(vec![failure()]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) = run_collecting(&executor, &PageOptions::new(), &fetcher).await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Fetch { page: 1, .. }));
    assert_eq!(err.code(), Some("Throttling"));
    assert!(pages.is_empty());
}

#[tokio::test]
async fn test_first_fetch_failure_is_fatal_with_budget() {
    let fetcher = ScriptedFetcher::new(vec![failure()]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().max_items(10), &fetcher).await;

    assert!(matches!(result, Err(Error::Fetch { page: 1, .. })));
    assert!(pages.is_empty());
}

#[tokio::test]
async fn test_bounded_listing_keeps_partial_result() {
    let fetcher = ScriptedFetcher::new(vec![
        page(&["a", "b", "c", "d", "e", "f"], "x1"),
        failure(),
    ]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().max_items(10), &fetcher).await;

    let summary = result.unwrap();
    assert_eq!(pages, vec![vec!["a", "b", "c", "d", "e", "f"]]);
    assert_eq!(summary.items, 6);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_unbounded_listing_surfaces_later_failure() {
    let fetcher = ScriptedFetcher::new(vec![page(&["a", "b"], "x1"), failure()]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) = run_collecting(&executor, &PageOptions::new(), &fetcher).await;

    assert!(matches!(result, Err(Error::Fetch { page: 2, .. })));
    assert_eq!(pages, vec![vec!["a", "b"]]);
}

#[tokio::test]
async fn test_bounded_listing_with_empty_first_page_surfaces_failure() {
    let fetcher = ScriptedFetcher::new(vec![page(&[], "x1"), failure()]);
    let executor = PaginatedListExecutor::new();

    let (result, pages) =
        run_collecting(&executor, &PageOptions::new().max_items(10), &fetcher).await;

    assert!(matches!(result, Err(Error::Fetch { page: 2, .. })));
    assert_eq!(pages.len(), 1);
}

// ============================================================================
// Filters and cancellation
// ============================================================================

#[tokio::test]
async fn test_filters_are_passed_to_every_fetch() {
    let fetcher = ScriptedFetcher::new(vec![page(&["a"], "x1"), last(&["b"])]);
    let filters = vec![Filter::new("engine", vec!["postgres".to_string()])];
    let executor = PaginatedListExecutor::new().with_filters(filters.clone());

    executor
        .collect(&PageOptions::new(), &fetcher)
        .await
        .unwrap();

    assert!(fetcher.requests().iter().all(|r| r.filters == filters));
}

#[tokio::test]
async fn test_cancelled_before_start_fetches_nothing() {
    let token = CancellationToken::new();
    token.cancel();
    let fetcher = ScriptedFetcher::new(vec![page(&["a"], "x1")]);
    let executor = PaginatedListExecutor::new().with_cancellation(token);

    let (result, pages) = run_collecting(&executor, &PageOptions::new(), &fetcher).await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(pages.is_empty());
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_cancel_during_emission_stops_before_next_fetch() {
    let token = CancellationToken::new();
    let fetcher = ScriptedFetcher::new(vec![page(&["a"], "x1"), last(&["b"])]);
    let executor = PaginatedListExecutor::new().with_cancellation(token.clone());

    let mut pages = Vec::new();
    let result = executor
        .run(&PageOptions::new(), &fetcher, |p| {
            pages.push(p.items);
            token.cancel();
        })
        .await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(pages, vec![vec!["a"]]);
    assert_eq!(fetcher.calls(), 1);
}

// ============================================================================
// Closure fetcher
// ============================================================================

#[tokio::test]
async fn test_fn_fetcher() {
    let fetcher = FnFetcher::new(|request: ListRequest| async move {
        match request.cursor.as_deref() {
            None => Ok(ListResponse::new(vec![1, 2], Some("next".to_string()))),
            Some("next") => Ok(ListResponse::last(vec![3])),
            Some(other) => Err(Error::Other(format!("unexpected cursor {other}"))),
        }
    });

    let items = PaginatedListExecutor::new()
        .collect(&PageOptions::new(), &fetcher)
        .await
        .unwrap();

    assert_eq!(items, vec![1, 2, 3]);
}

// ============================================================================
// State machine
// ============================================================================

#[test]
fn test_pagination_state_lifecycle() {
    let mut state = PaginationState::new(&PageOptions::new().max_items(5));
    assert_eq!(state.phase(), ExecutorPhase::Idle);
    assert_eq!(state.remaining_budget, Some(5));
    assert!(!state.user_controls_paging);

    state.begin_fetch();
    assert_eq!(state.phase(), ExecutorPhase::Fetching);
    assert!(state.failure_is_fatal());

    state.begin_emit();
    state.record_page(3, Some("x1".to_string()));
    assert_eq!(state.phase(), ExecutorPhase::Emitting);
    assert_eq!(state.remaining_budget, Some(2));
    assert_eq!(state.items_emitted, 3);
    assert!(state.should_continue());
    assert!(!state.failure_is_fatal());

    state.begin_fetch();
    state.begin_emit();
    state.record_page(2, Some(String::new()));
    assert_eq!(state.current_cursor, None);
    assert!(!state.should_continue());

    state.finish();
    assert!(state.phase().is_terminal());
}

#[test]
fn test_pagination_state_ignores_empty_initial_cursor() {
    let state = PaginationState::new(&PageOptions::new().cursor(""));
    assert_eq!(state.current_cursor, None);
    assert!(state.user_controls_paging);
}

#[test]
fn test_list_response_has_next() {
    assert!(ListResponse::new(vec![1], Some("x".to_string())).has_next());
    assert!(!ListResponse::new(vec![1], Some(String::new())).has_next());
    assert!(!ListResponse::<i32>::last(vec![]).has_next());
}

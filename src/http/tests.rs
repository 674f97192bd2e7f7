//! Tests for the HTTP client module

use super::*;
use crate::auth::{Credentials, SigV4Signer};
use crate::config::HttpConfig;
use crate::error::Error;
use crate::types::{BackoffType, QueryParams};
use pretty_assertions::assert_eq;
use std::time::Duration;
use test_case::test_case;
use url::Url;
use wiremock::matchers::{body_string, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const THROTTLING_BODY: &str = "<ErrorResponse><Error><Type>Sender</Type><Code>Throttling</Code>\
    <Message>Rate exceeded</Message></Error><RequestId>req-throttle</RequestId></ErrorResponse>";

fn params(pairs: &[(&str, &str)]) -> QueryParams {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn fast_client() -> HttpClient {
    let config = HttpClientConfig::builder()
        .max_retries(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(50),
        )
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

fn endpoint(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).unwrap()
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("rdsctl/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_http_client_config_from_http_config() {
    let mut http = HttpConfig::default();
    http.timeout_seconds = 5;
    http.max_retries = 7;
    http.rate_limit.requests_per_second = 0;

    let config = HttpClientConfig::from(&http);
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.max_retries, 7);
    assert_eq!(config.max_backoff, Duration::from_secs(20));
    assert_eq!(config.rate_limit, None);
}

#[test]
fn test_encode_form() {
    let body = encode_form(&params(&[
        ("Version", "2014-10-31"),
        ("Action", "DescribeDBInstances"),
        ("Filters.Filter.1.Values.Value.1", "aurora mysql"),
    ]));
    assert_eq!(
        body,
        "Action=DescribeDBInstances&Filters.Filter.1.Values.Value.1=aurora%20mysql&Version=2014-10-31"
    );
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_post_form_sends_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("content-type", FORM_CONTENT_TYPE))
        .and(body_string("Action=DescribeDBInstances&Version=2014-10-31"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = fast_client()
        .post_form(
            &endpoint(&mock_server),
            &params(&[("Action", "DescribeDBInstances"), ("Version", "2014-10-31")]),
        )
        .await
        .unwrap();

    assert_eq!(body, "<ok/>");
}

#[tokio::test]
async fn test_post_form_signs_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .and(header("x-amz-security-token", "session"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let signer = SigV4Signer::new(
        Credentials::new("AKID", "secret").with_session_token("session"),
        "us-east-1",
        "rds",
    );
    let client = fast_client().with_signer(signer);

    client
        .post_form(&endpoint(&mock_server), &params(&[("Action", "X")]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_retry_on_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
        .mount(&mock_server)
        .await;

    let body = fast_client()
        .post_form(&endpoint(&mock_server), &params(&[("Action", "X")]))
        .await
        .unwrap();

    assert_eq!(body, "<ok/>");
}

#[tokio::test]
async fn test_retry_on_throttling_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string(THROTTLING_BODY))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
        .mount(&mock_server)
        .await;

    let result = fast_client()
        .post_form(&endpoint(&mock_server), &params(&[("Action", "X")]))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_retry_after_header_on_429() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
        .mount(&mock_server)
        .await;

    // max backoff caps the one-second hint
    let result = fast_client()
        .post_form(&endpoint(&mock_server), &params(&[("Action", "X")]))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_retries_exhausted_returns_last_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string(THROTTLING_BODY))
        .expect(3)
        .mount(&mock_server)
        .await;

    let err = fast_client()
        .post_form(&endpoint(&mock_server), &params(&[("Action", "X")]))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("Throttling"));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("DBInstanceIdentifier=missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            "<ErrorResponse><Error><Type>Sender</Type><Code>DBInstanceNotFound</Code>\
             <Message>DBInstance missing not found.</Message></Error>\
             <RequestId>req-404</RequestId></ErrorResponse>",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = fast_client()
        .post_form(
            &endpoint(&mock_server),
            &params(&[("DBInstanceIdentifier", "missing")]),
        )
        .await
        .unwrap_err();

    match err {
        Error::Api {
            code,
            status,
            request_id,
            ..
        } => {
            assert_eq!(code, "DBInstanceNotFound");
            assert_eq!(status, 404);
            assert_eq!(request_id.as_deref(), Some("req-404"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_with_rate_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();
    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());

    for _ in 0..3 {
        client
            .post_form(&endpoint(&mock_server), &params(&[("Action", "X")]))
            .await
            .unwrap();
    }
}

// ============================================================================
// Backoff
// ============================================================================

fn client_with_backoff(backoff_type: BackoffType, max: Duration) -> HttpClient {
    let config = HttpClientConfig::builder()
        .backoff(backoff_type, Duration::from_millis(100), max)
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_calculate_backoff_constant() {
    let client = client_with_backoff(BackoffType::Constant, Duration::from_secs(10));

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(5), Duration::from_millis(100));
}

#[test]
fn test_calculate_backoff_linear() {
    let client = client_with_backoff(BackoffType::Linear, Duration::from_secs(10));

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[test]
fn test_calculate_backoff_exponential() {
    let client = client_with_backoff(BackoffType::Exponential, Duration::from_secs(10));

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(800));
}

#[test]
fn test_calculate_backoff_respects_max() {
    let client = client_with_backoff(BackoffType::Exponential, Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(10), Duration::from_millis(500));
}

#[test_case(BackoffType::Linear ; "linear")]
#[test_case(BackoffType::Exponential ; "exponential")]
fn test_calculate_backoff_saturates_at_max(backoff_type: BackoffType) {
    let config = HttpClientConfig::builder()
        .backoff(backoff_type, Duration::MAX, Duration::from_secs(30))
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();
    assert_eq!(client.calculate_backoff(u32::MAX), Duration::from_secs(30));
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::new().unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("has_signer"));
}

//! Tests for the HTTP client module

use super::*;
use crate::auth::AuthConfig;
use crate::error::Error;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config() -> HttpClientConfig {
    HttpClientConfig::builder()
        .backoff(Duration::from_millis(1), Duration::from_millis(10))
        .no_rate_limit()
        .build()
}

fn fast_client() -> HttpClient {
    HttpClient::with_config(fast_config()).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 4);
    assert_eq!(config.max_attempts(), 5);
    assert_eq!(config.initial_backoff, Duration::from_secs(2));
    assert!(config.rate_limit.is_none());
    assert_eq!(
        config.default_headers.get("Accept").map(String::as_str),
        Some(AIRSHIP_ACCEPT)
    );
    assert!(config.user_agent.starts_with("tap-urban-airship/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_retries(2)
        .backoff(Duration::from_millis(200), Duration::from_secs(30))
        .rate_limit(RateLimiterConfig::per_second(5))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_attempts(), 3);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(5, 5)));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[tokio::test]
async fn test_get_json_sends_airship_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/lists"))
        .and(header("Accept", AIRSHIP_ACCEPT))
        .and(header("User-Agent", "custom-agent/2.0"))
        .and(header("Authorization", "Basic a2V5OnNlY3JldA=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .user_agent("custom-agent/2.0")
        .no_rate_limit()
        .build();
    let client = HttpClient::with_auth(config, AuthConfig::basic("key", "secret")).unwrap();

    let body = client
        .get_json(&format!("{}/api/lists", server.uri()))
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_get_json_retries_server_errors_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(4)
        .expect(4)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let body = fast_client()
        .get_json(&format!("{}/api/flaky", server.uri()))
        .await
        .unwrap();
    assert_eq!(body["value"], 42);
}

#[tokio::test]
async fn test_get_json_gives_up_after_five_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/always-fail"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(5)
        .mount(&server)
        .await;

    let err = fast_client()
        .get_json(&format!("{}/api/always-fail", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_get_json_client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "ok": false,
            "error": "Could not find resource",
            "error_code": 40400
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = fast_client()
        .get_json(&format!("{}/api/missing", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_get_json_too_many_requests_is_permanent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .expect(1)
        .mount(&server)
        .await;

    let err = fast_client()
        .get_json(&format!("{}/api/limited", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 429, .. }));
}

#[tokio::test]
async fn test_get_json_connection_error_exhausts_retries() {
    // Bind then drop a listener so the port refuses connections
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let config = HttpClientConfig::builder()
        .max_retries(1)
        .backoff(Duration::from_millis(1), Duration::from_millis(1))
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.get_json(&format!("{uri}/api/lists")).await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_get_json_invalid_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/garbage"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = fast_client()
        .get_json(&format!("{}/api/garbage", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_get_json_with_rate_limiter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(3)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();
    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());

    for _ in 0..3 {
        client
            .get_json(&format!("{}/api/data", server.uri()))
            .await
            .unwrap();
    }
}

#[test]
fn test_calculate_backoff_exponential_base_two() {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_secs(2));
    assert_eq!(client.calculate_backoff(1), Duration::from_secs(4));
    assert_eq!(client.calculate_backoff(2), Duration::from_secs(8));
    assert_eq!(client.calculate_backoff(3), Duration::from_secs(16));
}

#[test]
fn test_calculate_backoff_respects_max() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(Duration::from_millis(100), Duration::from_millis(500))
            .build(),
    )
    .unwrap();

    assert_eq!(client.calculate_backoff(10), Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(40), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug_hides_password() {
    let client =
        HttpClient::with_auth(HttpClientConfig::default(), AuthConfig::basic("key", "hunter2"))
            .unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(!debug_str.contains("hunter2"));
}

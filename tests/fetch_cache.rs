//! Fetch-with-cache behaviour against a local mock server.

use hello_api::{ApiConfig, ApiError, ApiFetcher, FetchOptions};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(ttl: Duration) -> ApiFetcher {
    let config = ApiConfig::new().with_cache_ttl(ttl);
    ApiFetcher::new(&config).unwrap()
}

#[tokio::test]
async fn repeated_fetch_inside_window_hits_network_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prices"))
        .and(header("user-agent", "HelloBot/1.0"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"btc": 50000})))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher(Duration::from_secs(300));
    let url = format!("{}/prices", server.uri());

    let first = fetcher.fetch_json(&url, &FetchOptions::new()).await.unwrap();
    let second = fetcher.fetch_json(&url, &FetchOptions::new()).await.unwrap();

    assert_eq!(first, json!({"btc": 50000}));
    assert_eq!(first, second);
    assert_eq!(fetcher.cached_entries(), 1);
}

#[tokio::test]
async fn fetch_after_window_goes_back_to_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fetcher(Duration::from_millis(100));
    let url = format!("{}/prices", server.uri());

    fetcher.fetch_json(&url, &FetchOptions::new()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    let again = fetcher.fetch_json(&url, &FetchOptions::new()).await.unwrap();

    assert_eq!(again, json!([1, 2, 3]));
}

#[tokio::test]
async fn different_options_are_cached_separately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fetcher(Duration::from_secs(300));
    let url = format!("{}/data", server.uri());

    fetcher.fetch_json(&url, &FetchOptions::new()).await.unwrap();
    fetcher
        .fetch_json(&url, &FetchOptions::new().header("x-trace", "1"))
        .await
        .unwrap();

    assert_eq!(fetcher.cached_entries(), 2);
}

#[tokio::test]
async fn option_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("x-api-key", "secret"))
        .and(header("user-agent", "custom-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher(Duration::from_secs(300));
    let options = FetchOptions::new()
        .header("x-api-key", "secret")
        .header("User-Agent", "custom-agent");
    fetcher
        .fetch_json(&format!("{}/data", server.uri()), &options)
        .await
        .unwrap();
}

#[tokio::test]
async fn error_status_is_reported_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fetcher(Duration::from_secs(300));
    let url = format!("{}/down", server.uri());

    for _ in 0..2 {
        match fetcher.fetch_json(&url, &FetchOptions::new()).await {
            Err(ApiError::Http { status, url: failed }) => {
                assert_eq!(status, 503);
                assert_eq!(failed, url);
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }
    assert_eq!(fetcher.cached_entries(), 0);
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let fetcher = fetcher(Duration::from_secs(300));
    let err = fetcher
        .fetch_json(&format!("{}/html", server.uri()), &FetchOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn slow_endpoint_is_cut_off_by_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ApiConfig::new().with_request_timeout(Duration::from_millis(200));
    let fetcher = ApiFetcher::new(&config).unwrap();
    let result = fetcher
        .fetch_json(&format!("{}/slow", server.uri()), &FetchOptions::new())
        .await;

    assert!(result.is_err());
    assert_eq!(fetcher.cached_entries(), 0);
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let fetcher = fetcher(Duration::from_secs(300));
    let err = fetcher
        .fetch_json("http://127.0.0.1:1/nothing", &FetchOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }));
}

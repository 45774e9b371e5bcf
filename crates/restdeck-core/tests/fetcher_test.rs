// Fetch pipeline tests: caching, error recovery, and the proxy fallback.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use restdeck_api::RequestOptions;
use restdeck_core::{CacheUse, FetchConfig, Fetcher};

fn fetcher(proxy_prefix: Option<String>) -> Fetcher {
    Fetcher::new(&FetchConfig {
        proxy_prefix,
        ..FetchConfig::default()
    })
    .unwrap()
}

const TTL: CacheUse = CacheUse::Ttl(Duration::from_secs(60));

// ── Basic outcomes ──────────────────────────────────────────────────

#[tokio::test]
async fn test_success_returns_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "n": 1 })))
        .mount(&server)
        .await;

    let fetcher = fetcher(None);
    let result = fetcher
        .fetch(&format!("{}/data", server.uri()), &RequestOptions::get(), TTL)
        .await;

    assert!(result.is_success());
    assert!(!result.is_cached());
    assert_eq!(result.data().unwrap()["n"], 1);
    assert_eq!(result.error(), None);
}

#[tokio::test]
async fn test_http_error_becomes_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = fetcher(None);
    let result = fetcher
        .fetch(&format!("{}/data", server.uri()), &RequestOptions::get(), TTL)
        .await;

    assert!(!result.is_success());
    let error = result.error().unwrap();
    assert!(error.contains("HTTP 500"), "got: {error}");
}

// ── Cache interplay ─────────────────────────────────────────────────

#[tokio::test]
async fn test_cached_second_fetch_skips_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "n": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher(None);
    let url = format!("{}/data", server.uri());

    let first = fetcher.fetch(&url, &RequestOptions::get(), TTL).await;
    let second = fetcher.fetch(&url, &RequestOptions::get(), TTL).await;

    assert!(!first.is_cached());
    assert!(second.is_cached());
    assert_eq!(second.data().unwrap()["n"], 1);
    assert_eq!(fetcher.cache().stats().hits, 1);
}

#[tokio::test]
async fn test_bypass_always_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "n": 1 })))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fetcher(None);
    let url = format!("{}/data", server.uri());

    let first = fetcher.fetch(&url, &RequestOptions::get(), CacheUse::Bypass).await;
    let second = fetcher.fetch(&url, &RequestOptions::get(), CacheUse::Bypass).await;

    assert!(!first.is_cached());
    assert!(!second.is_cached());
    assert!(fetcher.cache().is_empty());
}

#[tokio::test]
async fn test_zero_ttl_never_serves_a_stale_hit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "n": 1 })))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fetcher(None);
    let url = format!("{}/data", server.uri());

    let first = fetcher
        .fetch(&url, &RequestOptions::get(), CacheUse::Ttl(Duration::ZERO))
        .await;
    let second = fetcher
        .fetch(&url, &RequestOptions::get(), CacheUse::Ttl(Duration::ZERO))
        .await;

    assert!(!first.is_cached());
    assert!(!second.is_cached());
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fetcher(None);
    let url = format!("{}/data", server.uri());

    let first = fetcher.fetch(&url, &RequestOptions::get(), TTL).await;
    let second = fetcher.fetch(&url, &RequestOptions::get(), TTL).await;

    assert!(!first.is_success());
    assert!(!second.is_success());
    assert!(fetcher.cache().is_empty());
}

// ── Proxy fallback ──────────────────────────────────────────────────

#[tokio::test]
async fn test_proxy_rescues_a_network_failure() {
    let relay = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/relay/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "n": 42 })))
        .expect(1)
        .mount(&relay)
        .await;

    let fetcher = fetcher(Some(format!("{}/relay/", relay.uri())));

    // Nothing listens on the discard port, so the origin fails pre-status.
    let result = fetcher
        .fetch("http://127.0.0.1:9/data", &RequestOptions::get(), TTL)
        .await;

    assert!(result.is_success());
    assert!(!result.is_cached());
    assert_eq!(result.data().unwrap()["n"], 42);

    // The rescued payload is cached under the original URL.
    let second = fetcher
        .fetch("http://127.0.0.1:9/data", &RequestOptions::get(), TTL)
        .await;
    assert!(second.is_cached());
}

#[tokio::test]
async fn test_proxy_failure_is_distinguished() {
    let fetcher = fetcher(Some("http://127.0.0.1:9/relay/".to_owned()));

    let result = fetcher
        .fetch("http://127.0.0.1:9/data", &RequestOptions::get(), TTL)
        .await;

    let error = result.error().unwrap();
    assert!(error.starts_with("proxy fallback failed:"), "got: {error}");
}

#[tokio::test]
async fn test_network_error_without_proxy_passes_through() {
    let fetcher = fetcher(None);

    let result = fetcher
        .fetch("http://127.0.0.1:9/data", &RequestOptions::get(), TTL)
        .await;

    let error = result.error().unwrap();
    assert!(error.contains("transport error"), "got: {error}");
    assert!(!error.starts_with("proxy fallback failed:"));
}

#[tokio::test]
async fn test_http_errors_do_not_trigger_the_proxy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let relay = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(".*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&relay)
        .await;

    let fetcher = fetcher(Some(format!("{}/relay/", relay.uri())));
    let result = fetcher
        .fetch(&format!("{}/data", server.uri()), &RequestOptions::get(), TTL)
        .await;

    assert!(result.error().unwrap().contains("HTTP 404"));
}

// ── Probing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_probe_discovers_fields_and_bypasses_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "bitcoin",
            "price": { "usd": 50000.0 },
        })))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fetcher(None);
    let url = format!("{}/coin", server.uri());

    let probe = fetcher.probe(&url, &RequestOptions::get(), 3).await;
    assert!(probe.fetch.is_success());
    let paths: Vec<&str> = probe.fields.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["name", "price", "price.usd"]);

    // A second probe refetches even though the body is unchanged.
    let again = fetcher.probe(&url, &RequestOptions::get(), 3).await;
    assert!(again.fetch.is_success());
    assert!(fetcher.cache().is_empty());
}

#[tokio::test]
async fn test_probe_failure_lists_no_fields() {
    let fetcher = fetcher(None);

    let probe = fetcher
        .probe("http://127.0.0.1:9/data", &RequestOptions::get(), 3)
        .await;

    assert!(!probe.fetch.is_success());
    assert!(probe.fields.is_empty());
}

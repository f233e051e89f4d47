//! Header probe behaviour against a local server.

mod helpers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use httptest::{matchers::*, responders::*, Expectation, Server};

use helpers::{serve_security_headers, serve_slow_headers};
use page_hygiene::enrich::{HeaderProbe, HttpHeaderProbe};
use page_hygiene::models::{HeaderProbeResult, ProbeFailureKind};
use page_hygiene::security::missing_header_penalties;

fn probe() -> HttpHeaderProbe {
    HttpHeaderProbe::new(Arc::new(reqwest::Client::new()))
}

#[tokio::test]
async fn test_readable_headers_are_lowercased() {
    let server = Server::run();
    serve_security_headers(&server);

    let url = format!("http://{}/", server.addr());
    let result = probe().head_request(&url, Duration::from_secs(3)).await;
    let headers = result.headers().expect("headers should be readable");
    assert_eq!(
        headers.get("x-frame-options").map(String::as_str),
        Some("DENY")
    );
    assert!(headers.keys().all(|k| k == &k.to_ascii_lowercase()));
    assert!(missing_header_penalties(headers).is_empty());
}

#[tokio::test]
async fn test_error_status_still_yields_headers() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/"))
            .respond_with(status_code(405).append_header("X-Content-Type-Options", "nosniff")),
    );
    let url = format!("http://{}/", server.addr());
    let result = probe().head_request(&url, Duration::from_secs(3)).await;
    assert!(result.is_success());
}

#[tokio::test]
async fn test_probe_times_out_within_bound() {
    let server = Server::run();
    serve_slow_headers(&server, Duration::from_secs(3));
    let url = format!("http://{}/", server.addr());

    let start = Instant::now();
    let result = probe().head_request(&url, Duration::from_millis(300)).await;
    assert!(start.elapsed() < Duration::from_secs(2));
    match result {
        HeaderProbeResult::Failure { kind, reason } => {
            assert_eq!(kind, ProbeFailureKind::Timeout);
            assert!(reason.contains("timed out"));
        }
        other => panic!("expected a timeout failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refused_connection_is_network_failure() {
    let result = probe()
        .head_request("http://127.0.0.1:9/", Duration::from_secs(2))
        .await;
    assert!(!result.is_success());
    assert!(result.failure_reason().is_some());
}

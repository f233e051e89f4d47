// Shared test helpers for integration tests.
//
// Each integration test file pulls this in with `mod helpers;`.

use std::path::PathBuf;
use std::time::Duration;

use httptest::{matchers::*, responders::*, Expectation, Server};
use tempfile::TempDir;

use page_hygiene::models::TabId;
use page_hygiene::Config;

/// Response headers of a well-configured site.
pub const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("Content-Security-Policy", "default-src 'self'"),
    ("Strict-Transport-Security", "max-age=63072000"),
    ("X-Frame-Options", "DENY"),
    ("X-Content-Type-Options", "nosniff"),
];

/// Serves `html` for `GET /`, any number of times.
#[allow(dead_code)]
pub fn serve_page(server: &Server, html: &'static str, set_cookies: &[&'static str]) {
    let mut responder = status_code(200).append_header("Content-Type", "text/html; charset=utf-8");
    for cookie in set_cookies {
        responder = responder.append_header("Set-Cookie", *cookie);
    }
    server.expect(
        Expectation::matching(request::method_path("GET", "/"))
            .times(..)
            .respond_with(responder.body(html)),
    );
}

/// Answers `HEAD /` with every security header.
#[allow(dead_code)]
pub fn serve_security_headers(server: &Server) {
    let mut responder = status_code(200);
    for (name, value) in SECURITY_HEADERS {
        responder = responder.append_header(name, value);
    }
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/"))
            .times(..)
            .respond_with(responder),
    );
}

/// Answers `HEAD /` only after `delay`.
#[allow(dead_code)]
pub fn serve_slow_headers(server: &Server, delay: Duration) {
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/"))
            .times(..)
            .respond_with(delay_and_then(delay, status_code(200))),
    );
}

/// Scan configuration against a mock server with the report store in `dir`.
#[allow(dead_code)]
pub fn test_config(server: &Server, dir: &TempDir, tab: Option<u64>) -> Config {
    Config {
        url: format!("http://{}/", server.addr()),
        tab_id: tab.map(TabId),
        db_path: db_path(dir),
        fetch_timeout: Duration::from_secs(5),
        header_timeout: Duration::from_millis(1000),
        webrtc_timeout: Duration::from_millis(100),
        enable_webrtc: false,
        user_agent: "page_hygiene_test/1.0".to_string(),
    }
}

/// Hostname the page reports for the mock server, e.g. `127.0.0.1` or `[::1]`.
#[allow(dead_code)]
pub fn server_host(server: &Server) -> String {
    let url = url::Url::parse(&format!("http://{}/", server.addr())).expect("server URL");
    url.host_str().expect("server host").to_string()
}

#[allow(dead_code)]
pub fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("reports.db")
}

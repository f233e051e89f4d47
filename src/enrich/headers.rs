//! Best-effort response header probe.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::HeaderMap;

use crate::config::MAX_HEADER_COUNT;
use crate::models::{HeaderProbeResult, ProbeFailureKind};

/// Reason recorded when a response arrives without readable headers.
pub const OPAQUE_REASON: &str = "opaque-or-no-headers";

/// Issues a header-only request to a URL within a deadline.
///
/// Implementations never fail: every problem is reported as
/// [`HeaderProbeResult::Failure`], and the in-flight request is abandoned
/// when the deadline passes.
pub trait HeaderProbe: Send + Sync {
    fn head_request<'a>(&'a self, url: &'a str, timeout: Duration)
        -> BoxFuture<'a, HeaderProbeResult>;
}

/// Probes with a `HEAD` request over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpHeaderProbe {
    client: Arc<reqwest::Client>,
}

impl HttpHeaderProbe {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }
}

impl HeaderProbe for HttpHeaderProbe {
    fn head_request<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
    ) -> BoxFuture<'a, HeaderProbeResult> {
        Box::pin(async move {
            // Dropping the send future on timeout aborts the request.
            match tokio::time::timeout(timeout, self.client.head(url).send()).await {
                Err(_) => {
                    log::debug!("Header probe for {} timed out", url);
                    timeout_failure(timeout)
                }
                Ok(Err(e)) if e.is_timeout() => timeout_failure(timeout),
                Ok(Err(e)) => {
                    log::debug!("Header probe for {} failed: {}", url, e);
                    HeaderProbeResult::failure(ProbeFailureKind::Network, e.to_string())
                }
                Ok(Ok(response)) => {
                    log::trace!("Header probe for {} -> {}", url, response.status());
                    classify_headers(response.headers())
                }
            }
        })
    }
}

fn timeout_failure(timeout: Duration) -> HeaderProbeResult {
    HeaderProbeResult::failure(
        ProbeFailureKind::Timeout,
        format!("timed out after {}ms", timeout.as_millis()),
    )
}

/// Turns response headers into a probe result.
///
/// Names are lowercased and repeated headers are joined with `", "`. Values
/// that are not valid UTF-8 are skipped. A response with no headers at all
/// is treated as opaque.
pub fn classify_headers(headers: &HeaderMap) -> HeaderProbeResult {
    if headers.is_empty() {
        return HeaderProbeResult::failure(ProbeFailureKind::Opaque, OPAQUE_REASON);
    }

    let mut collected: HashMap<String, String> = HashMap::new();
    for name in headers.keys().take(MAX_HEADER_COUNT) {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if values.is_empty() {
            continue;
        }
        collected.insert(name.as_str().to_ascii_lowercase(), values.join(", "));
    }
    HeaderProbeResult::Success { headers: collected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_classify_empty_headers_is_opaque() {
        let result = classify_headers(&HeaderMap::new());
        assert_eq!(
            result,
            HeaderProbeResult::failure(ProbeFailureKind::Opaque, OPAQUE_REASON)
        );
    }

    #[test]
    fn test_classify_joins_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append("X-Frame-Options", HeaderValue::from_static("DENY"));
        headers.append("vary", HeaderValue::from_static("accept"));
        headers.append("vary", HeaderValue::from_static("origin"));
        let result = classify_headers(&headers);
        let map = result.headers().unwrap();
        assert_eq!(map.get("x-frame-options").map(String::as_str), Some("DENY"));
        assert_eq!(map.get("vary").map(String::as_str), Some("accept, origin"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_failure() {
        let client = Arc::new(reqwest::Client::new());
        let probe = HttpHeaderProbe::new(client);
        // Port 9 on localhost is almost never listening.
        let result = probe
            .head_request("http://127.0.0.1:9/", Duration::from_secs(2))
            .await;
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_malformed_url_is_network_failure() {
        let probe = HttpHeaderProbe::new(Arc::new(reqwest::Client::new()));
        let result = probe
            .head_request("not a url", Duration::from_millis(200))
            .await;
        assert!(matches!(
            result,
            HeaderProbeResult::Failure {
                kind: ProbeFailureKind::Network,
                ..
            }
        ));
    }
}

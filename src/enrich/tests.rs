//! Enricher tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::Value;

use super::*;
use crate::models::{Cookie, ProbeFailureKind, SameSite};
use crate::protocol::MessageBus;
use crate::security::Penalty;
use crate::storage::{KeyValueStore, MemoryStore};

struct FixedHeaders(HeaderProbeResult);

impl HeaderProbe for FixedHeaders {
    fn head_request<'a>(&'a self, _url: &'a str, _timeout: Duration) -> BoxFuture<'a, HeaderProbeResult> {
        Box::pin(async move { self.0.clone() })
    }
}

struct FailingCookies;

impl CookieSource for FailingCookies {
    fn get_cookies<'a>(&'a self, _domain: &'a str) -> BoxFuture<'a, anyhow::Result<Vec<Cookie>>> {
        Box::pin(async { Err(anyhow::anyhow!("cookie access denied")) })
    }
}

/// Backend whose writes always fail.
#[derive(Default)]
struct BrokenStore {
    attempts: AtomicUsize,
}

impl KeyValueStore for BrokenStore {
    fn set_many<'a>(&'a self, _entries: Vec<(String, Value)>) -> BoxFuture<'a, Result<(), StoreError>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Err(StoreError::FileCreation("read-only medium".to_string())) })
    }

    fn get<'a>(&'a self, _keys: &'a [String]) -> BoxFuture<'a, Result<HashMap<String, Value>, StoreError>> {
        Box::pin(async { Ok(HashMap::new()) })
    }

    fn keys_with_prefix<'a>(&'a self, _prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

fn all_headers() -> HeaderProbeResult {
    HeaderProbeResult::success([
        ("Content-Security-Policy", "default-src 'self'"),
        ("Strict-Transport-Security", "max-age=63072000"),
        ("X-Frame-Options", "DENY"),
        ("X-Content-Type-Options", "nosniff"),
    ])
}

fn cookie(name: &str, secure: bool, http_only: bool) -> Cookie {
    Cookie {
        name: name.to_string(),
        value: "v".to_string(),
        domain: "example.com".to_string(),
        path: "/".to_string(),
        secure,
        http_only,
        same_site: SameSite::Lax,
        host_only: true,
        session: true,
    }
}

fn secure_report() -> PageReport {
    PageReport {
        url: "https://example.com/".to_string(),
        hostname: "example.com".to_string(),
        is_secure: true,
        ..Default::default()
    }
}

fn enricher(
    cookies: Arc<dyn CookieSource>,
    headers: HeaderProbeResult,
    backend: Arc<dyn KeyValueStore>,
    bus: &MessageBus,
) -> Enricher {
    Enricher::new(
        cookies,
        Arc::new(FixedHeaders(headers)),
        ReportStore::new(backend),
        bus.notifier(),
        Duration::from_millis(3000),
    )
}

#[tokio::test]
async fn test_enrich_counts_cookies_and_stores_both_keys() {
    let jar = Arc::new(CookieJar::new());
    jar.insert(cookie("a", true, true));
    jar.insert(cookie("b", false, true));
    jar.insert(cookie("c", false, false));

    let backend = Arc::new(MemoryStore::new());
    let (bus, _inbox) = MessageBus::new();
    let mut notifications = bus.subscribe();
    let enricher = enricher(jar, all_headers(), backend.clone(), &bus);

    let (key, scored) = enricher
        .enrich(secure_report(), Some(TabId(11)))
        .await
        .unwrap();
    assert_eq!(key.to_string(), "report_tab_11");
    assert_eq!(scored.cookie_count, 3);
    assert_eq!(scored.insecure_cookie_count, 2);
    // -10 no CSRF, -4 two insecure cookies, -1 one cookie without HttpOnly
    assert_eq!(scored.score, 85);
    assert!(scored.last_updated > 0);

    let store = ReportStore::new(backend);
    assert_eq!(store.get(&key).await.unwrap(), Some(scored.clone()));
    assert_eq!(
        store.latest_for_host("example.com").await.unwrap(),
        Some(scored.clone())
    );

    match notifications.recv().await.unwrap() {
        Message::ReportStored { key, data } => {
            assert_eq!(key, "report_tab_11");
            assert_eq!(data, scored);
        }
        other => panic!("unexpected notification {:?}", other),
    }
}

#[tokio::test]
async fn test_enrich_without_tab_uses_host_key() {
    let (bus, _inbox) = MessageBus::new();
    let enricher = enricher(
        Arc::new(CookieJar::new()),
        all_headers(),
        Arc::new(MemoryStore::new()),
        &bus,
    );
    let (key, _) = enricher.enrich(secure_report(), None).await.unwrap();
    assert_eq!(key, StoreKey::Host("example.com".to_string()));
}

#[tokio::test]
async fn test_failed_sub_fetches_still_score_and_store() {
    let backend = Arc::new(MemoryStore::new());
    let (bus, _inbox) = MessageBus::new();
    let enricher = enricher(
        Arc::new(FailingCookies),
        HeaderProbeResult::failure(ProbeFailureKind::Timeout, "timed out after 3000ms"),
        backend.clone(),
        &bus,
    );

    let report = PageReport {
        url: "http://example.com/".to_string(),
        hostname: "example.com".to_string(),
        is_secure: false,
        ..Default::default()
    };
    let (key, scored) = enricher.enrich(report, None).await.unwrap();
    assert_eq!(scored.cookie_count, 0);
    assert_eq!(scored.score, 57);
    assert!(scored
        .penalties
        .iter()
        .any(|p| p.penalty == Penalty::HeadersUnknown));
    assert!(ReportStore::new(backend).get(&key).await.unwrap().is_some());
}

#[tokio::test]
async fn test_store_failure_is_returned_and_not_announced() {
    let backend = Arc::new(BrokenStore::default());
    let (bus, _inbox) = MessageBus::new();
    let mut notifications = bus.subscribe();
    let enricher = enricher(Arc::new(CookieJar::new()), all_headers(), backend.clone(), &bus);

    let result = enricher.enrich(secure_report(), Some(TabId(1))).await;
    assert!(result.is_err());
    assert_eq!(backend.attempts.load(Ordering::SeqCst), 1);
    assert!(notifications.try_recv().is_err());
}

#[tokio::test]
async fn test_evaluate_does_not_store() {
    let backend = Arc::new(MemoryStore::new());
    let (bus, _inbox) = MessageBus::new();
    let enricher = enricher(Arc::new(CookieJar::new()), all_headers(), backend.clone(), &bus);
    let scored = enricher.evaluate(secure_report()).await;
    assert_eq!(scored.score, 90);
    assert!(backend.keys_with_prefix("").await.unwrap().is_empty());
}

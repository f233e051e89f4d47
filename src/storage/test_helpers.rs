//! Shared test helpers for storage module tests.

use std::collections::BTreeSet;

use tempfile::TempDir;

use crate::models::{HeaderProbeResult, PageReport, ScoredReport};
use crate::storage::SqliteStore;

/// Opens a migrated store in a fresh temporary directory.
///
/// The directory must outlive the store, so it is returned alongside it.
/// A file-backed database is used because every pooled connection to
/// `sqlite::memory:` would see its own empty database.
pub async fn create_test_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteStore::open(&dir.path().join("reports.db"))
        .await
        .expect("Failed to open test store");
    (store, dir)
}

/// Builds a scored report for `hostname` with a fixed score and timestamp.
pub fn scored_report(hostname: &str, score: u8, last_updated: i64) -> ScoredReport {
    ScoredReport {
        report: PageReport {
            url: format!("https://{hostname}/"),
            hostname: hostname.to_string(),
            is_secure: true,
            csrf_tokens: BTreeSet::from(["csrf_token".to_string()]),
            ..Default::default()
        },
        cookie_count: 0,
        insecure_cookie_count: 0,
        header_info: HeaderProbeResult::success([("content-security-policy", "default-src 'self'")]),
        score,
        last_updated,
        penalties: Vec::new(),
    }
}

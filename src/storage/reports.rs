//! Typed access to scored reports.

use std::sync::Arc;

use serde_json::Value;

use super::{KeyValueStore, StoreKey};
use crate::config::{KEY_PREFIX_HOST, KEY_PREFIX_LAST, KEY_PREFIX_TAB};
use crate::error_handling::StoreError;
use crate::models::ScoredReport;

/// Stores and loads [`ScoredReport`]s over any [`KeyValueStore`].
#[derive(Clone)]
pub struct ReportStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportStore").finish_non_exhaustive()
    }
}

fn encode(key: &StoreKey, report: &ScoredReport) -> Result<Value, StoreError> {
    serde_json::to_value(report).map_err(|source| StoreError::Codec {
        key: key.to_string(),
        source,
    })
}

impl ReportStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Writes one report under one key, replacing any previous value.
    pub async fn put(&self, key: &StoreKey, report: &ScoredReport) -> Result<(), StoreError> {
        let value = encode(key, report)?;
        self.backend.set(key.to_string(), value).await
    }

    /// Writes `report` under its primary key and the `last_report_<hostname>`
    /// index in a single backend write.
    pub async fn put_with_index(
        &self,
        primary: &StoreKey,
        report: &ScoredReport,
    ) -> Result<(), StoreError> {
        let index = StoreKey::last_report(&report.report.hostname);
        let value = encode(primary, report)?;
        let mut entries = vec![(primary.to_string(), value.clone())];
        if &index != primary {
            entries.push((index.to_string(), value));
        }
        self.backend.set_many(entries).await
    }

    pub async fn get(&self, key: &StoreKey) -> Result<Option<ScoredReport>, StoreError> {
        let key = key.to_string();
        let mut found = self.backend.get(std::slice::from_ref(&key)).await?;
        match found.remove(&key) {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Codec { key, source }),
            None => Ok(None),
        }
    }

    /// Most recent report for a hostname regardless of which tab produced it.
    pub async fn latest_for_host(&self, hostname: &str) -> Result<Option<ScoredReport>, StoreError> {
        self.get(&StoreKey::last_report(hostname)).await
    }

    /// Every report key currently stored, sorted.
    pub async fn list(&self) -> Result<Vec<StoreKey>, StoreError> {
        let mut keys = Vec::new();
        for prefix in [KEY_PREFIX_TAB, KEY_PREFIX_HOST, KEY_PREFIX_LAST] {
            for raw in self.backend.keys_with_prefix(prefix).await? {
                match raw.parse() {
                    Ok(key) => keys.push(key),
                    Err(e) => log::warn!("Skipping unrecognized store key: {}", e),
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Raw keys starting with `prefix`.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.backend.keys_with_prefix(prefix).await
    }
}

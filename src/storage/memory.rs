//! In-process key/value backend.

use std::collections::HashMap;
use std::sync::RwLock;

use futures::future::BoxFuture;
use serde_json::Value;

use super::KeyValueStore;
use crate::error_handling::StoreError;

/// Key/value store held in memory. Each `set_many` call is applied under one
/// write lock, so readers see either all or none of it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn set_many<'a>(
        &'a self,
        entries: Vec<(String, Value)>,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            // A poisoned lock only means another writer panicked mid-insert;
            // HashMap inserts leave the map consistent, so keep going.
            let mut map = self
                .entries
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            map.extend(entries);
            Ok(())
        })
    }

    fn get<'a>(&'a self, keys: &'a [String]) -> BoxFuture<'a, Result<HashMap<String, Value>, StoreError>> {
        Box::pin(async move {
            let map = self
                .entries
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            Ok(keys
                .iter()
                .filter_map(|key| map.get(key).map(|value| (key.clone(), value.clone())))
                .collect())
        })
    }

    fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>> {
        Box::pin(async move {
            let map = self
                .entries
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let mut keys: Vec<String> = map
                .keys()
                .filter(|key| key.starts_with(prefix))
                .cloned()
                .collect();
            keys.sort();
            Ok(keys)
        })
    }
}

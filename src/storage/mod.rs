//! Report store.
//!
//! Scored reports are persisted as JSON values in a flat key/value space:
//! - `report_tab_<id>` when the producing tab is known
//! - `report_host_<hostname>` otherwise
//! - `last_report_<hostname>`, written with every report so popups can look
//!   up a host without knowing the tab
//!
//! Two backends are provided: [`MemoryStore`] for a single process and
//! [`SqliteStore`] for reports that outlive it. Writes are last-writer-wins
//! per key.

mod keys;
mod memory;
mod migrations;
mod pool;
mod reports;
mod sqlite;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error_handling::StoreError;

pub use keys::{ParseKeyError, StoreKey};
pub use memory::MemoryStore;
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use reports::ReportStore;
pub use sqlite::SqliteStore;

/// Persistent key/value storage for JSON values.
pub trait KeyValueStore: Send + Sync {
    /// Writes every entry or none of them.
    fn set_many<'a>(&'a self, entries: Vec<(String, Value)>)
        -> BoxFuture<'a, Result<(), StoreError>>;

    /// Values for the requested keys. Missing keys are absent from the map.
    fn get<'a>(&'a self, keys: &'a [String])
        -> BoxFuture<'a, Result<HashMap<String, Value>, StoreError>>;

    /// Stored keys starting with `prefix`, sorted.
    fn keys_with_prefix<'a>(&'a self, prefix: &'a str)
        -> BoxFuture<'a, Result<Vec<String>, StoreError>>;

    fn set<'a>(&'a self, key: String, value: Value) -> BoxFuture<'a, Result<(), StoreError>> {
        self.set_many(vec![(key, value)])
    }
}

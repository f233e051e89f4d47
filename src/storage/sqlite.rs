//! SQLite-backed key/value store.

use std::collections::HashMap;
use std::path::Path;

use futures::future::BoxFuture;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use super::migrations::run_migrations;
use super::pool::init_db_pool_with_path;
use super::KeyValueStore;
use crate::error_handling::StoreError;

/// Persistent key/value store. Values are kept as JSON text, one row per key.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the store at `db_path` and applies migrations.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let pool = init_db_pool_with_path(db_path).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

impl KeyValueStore for SqliteStore {
    fn set_many<'a>(
        &'a self,
        entries: Vec<(String, Value)>,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let now = chrono::Utc::now().timestamp_millis();
            let mut tx = self.pool.begin().await?;
            for (key, value) in entries {
                let json = serde_json::to_string(&value).map_err(|source| StoreError::Codec {
                    key: key.clone(),
                    source,
                })?;
                sqlx::query(
                    "INSERT INTO report_store (store_key, value_json, updated_at_ms)
                     VALUES (?, ?, ?)
                     ON CONFLICT(store_key) DO UPDATE SET
                         value_json = excluded.value_json,
                         updated_at_ms = excluded.updated_at_ms",
                )
                .bind(&key)
                .bind(json)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
            Ok(())
        })
    }

    fn get<'a>(&'a self, keys: &'a [String]) -> BoxFuture<'a, Result<HashMap<String, Value>, StoreError>> {
        Box::pin(async move {
            let mut found = HashMap::with_capacity(keys.len());
            for key in keys {
                let row = sqlx::query("SELECT value_json FROM report_store WHERE store_key = ?")
                    .bind(key)
                    .fetch_optional(&self.pool)
                    .await?;
                if let Some(row) = row {
                    let json: String = row.get("value_json");
                    let value = serde_json::from_str(&json).map_err(|source| StoreError::Codec {
                        key: key.clone(),
                        source,
                    })?;
                    found.insert(key.clone(), value);
                }
            }
            Ok(found)
        })
    }

    fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>> {
        Box::pin(async move {
            // LIKE treats '_' as a wildcard and every key prefix contains one.
            let rows = sqlx::query(
                "SELECT store_key FROM report_store
                 WHERE substr(store_key, 1, length(?1)) = ?1
                 ORDER BY store_key",
            )
            .bind(prefix)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows.iter().map(|row| row.get("store_key")).collect())
        })
    }
}

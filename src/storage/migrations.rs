//! Schema setup for the report store.

use std::path::Path;

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;

use crate::error_handling::StoreError;

/// Applies every pending migration from the crate's `migrations/` directory.
///
/// Safe to call on every open: applied versions are recorded by sqlx and
/// skipped.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = Migrator::new(dir.as_path()).await?;
    log::debug!(
        "Applying {} report store migration(s) from {}",
        migrator.iter().count(),
        dir.display()
    );
    migrator.run(pool).await?;
    Ok(())
}

//! Scan resource initialization.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::app::validate_and_normalize_url;
use crate::config::Config;
use crate::enrich::CookieJar;
use crate::initialization::{init_client, init_probe_client};
use crate::storage::{ReportStore, SqliteStore};
use crate::webrtc::{LocalInterfaceConnector, PeerConnector};

use super::resources::ScanResources;

/// Initialize all resources needed for a scan.
///
/// 1. Validate and normalize the page URL
/// 2. Build the HTTP clients
/// 3. Open the report store and run migrations
/// 4. Choose the WebRTC candidate source
///
/// # Errors
///
/// Returns an error if any initialization step fails.
pub async fn init_scan_resources(config: &Config) -> Result<ScanResources> {
    let url = validate_and_normalize_url(&config.url).context("Invalid page URL")?;

    let client = init_client(config).context("Failed to initialize HTTP client")?;
    let probe_client = init_probe_client(config).context("Failed to initialize probe client")?;

    let backend = SqliteStore::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open report store at {}", config.db_path.display()))?;
    info!("Report store: {}", config.db_path.display());

    let connector: Option<Arc<dyn PeerConnector>> = if config.enable_webrtc {
        Some(Arc::new(LocalInterfaceConnector::new()))
    } else {
        info!("WebRTC probe disabled");
        None
    };

    Ok(ScanResources {
        url,
        client,
        probe_client,
        cookie_jar: Arc::new(CookieJar::new()),
        store: ReportStore::new(Arc::new(backend)),
        connector,
    })
}

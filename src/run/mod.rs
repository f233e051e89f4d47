//! End-to-end scan orchestration.
//!
//! Wires a page context and a background context together over the message
//! bus, runs one evaluation, and waits for the stored result.

mod init;
mod resources;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use tokio::sync::broadcast;

use crate::config::{Config, REPORT_WAIT_TIMEOUT};
use crate::enrich::{Enricher, HttpHeaderProbe};
use crate::fetch::PageAgent;
use crate::models::ScoredReport;
use crate::protocol::{Message, MessageBus};
use crate::service::BackgroundService;
use crate::storage::{ReportStore, SqliteStore, StoreKey};

pub use init::init_scan_resources;
pub use resources::ScanResources;

/// Result of [`run_scan`].
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Key the report was stored under.
    pub key: StoreKey,
    pub report: ScoredReport,
    /// Whether the result arrived as a `REPORT_STORED` notification rather
    /// than being pulled from the store afterwards.
    pub notified: bool,
}

/// Evaluates `config.url` once and returns the stored, scored report.
///
/// # Errors
///
/// Fails when initialization fails, when the page cannot be loaded, or when
/// the report could not be stored.
pub async fn run_scan(config: Config) -> Result<ScanOutcome> {
    let resources = init_scan_resources(&config).await?;
    scan_with_resources(resources, &config).await
}

/// Like [`run_scan`] with resources built by the caller.
pub async fn scan_with_resources(resources: ScanResources, config: &Config) -> Result<ScanOutcome> {
    let (bus, inbox) = MessageBus::new();
    let mut notifications = bus.subscribe();

    let enricher = Enricher::new(
        resources.cookie_jar.clone(),
        Arc::new(HttpHeaderProbe::new(resources.probe_client.clone())),
        resources.store.clone(),
        bus.notifier(),
        config.header_timeout,
    );
    let service = tokio::spawn(BackgroundService::new(enricher).run(inbox));

    let agent = PageAgent::new(
        resources.client.clone(),
        resources.cookie_jar.clone(),
        resources.url.clone(),
        resources.connector.clone(),
        config.webrtc_timeout,
    );
    let port = bus.page_port(config.tab_id);
    info!("Evaluating {}", resources.url);
    let page_report = agent
        .scan_and_post(&port)
        .await
        .with_context(|| format!("Failed to evaluate {}", resources.url))?;
    drop(port);

    let key = StoreKey::primary(config.tab_id, &page_report.hostname);
    let expected = key.to_string();
    let wait = REPORT_WAIT_TIMEOUT.max(config.header_timeout + Duration::from_secs(1));
    let notified = wait_for_stored(&mut notifications, &expected, wait).await;

    // Closing the bus lets the service drain and stop.
    drop(bus);
    let stats = service.await.context("Background service task failed")?;
    debug!("Background service finished: {:?}", stats);

    if let Some(report) = notified {
        return Ok(ScanOutcome {
            key,
            report,
            notified: true,
        });
    }

    warn!("No REPORT_STORED notification for {}; reading the store", key);
    match resources.store.get(&key).await? {
        Some(report) => Ok(ScanOutcome {
            key,
            report,
            notified: false,
        }),
        None => bail!("Report for {} was not stored", key),
    }
}

async fn wait_for_stored(
    notifications: &mut broadcast::Receiver<Message>,
    expected_key: &str,
    wait: Duration,
) -> Option<ScoredReport> {
    let waiting = async {
        loop {
            match notifications.recv().await {
                Ok(Message::ReportStored { key, data }) if key == expected_key => return Some(data),
                Ok(other) => debug!("Ignoring {} notification", other.kind()),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!("Missed {} notifications", missed)
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    };
    tokio::time::timeout(wait, waiting).await.ok().flatten()
}

/// Opens the report store at `db_path`.
pub async fn open_report_store(db_path: &Path) -> Result<ReportStore> {
    let backend = SqliteStore::open(db_path)
        .await
        .with_context(|| format!("Failed to open report store at {}", db_path.display()))?;
    Ok(ReportStore::new(Arc::new(backend)))
}

/// Looks up a report by store key, or by hostname through the
/// `last_report_<hostname>` index when `key_or_host` is not a key.
pub async fn find_report(
    store: &ReportStore,
    key_or_host: &str,
) -> Result<Option<(StoreKey, ScoredReport)>> {
    let key = key_or_host
        .parse::<StoreKey>()
        .unwrap_or_else(|_| StoreKey::last_report(&key_or_host.to_ascii_lowercase()));
    Ok(store.get(&key).await?.map(|report| (key, report)))
}

/// Every stored report, optionally restricted to keys starting with `prefix`.
pub async fn list_reports(
    store: &ReportStore,
    prefix: Option<&str>,
) -> Result<Vec<(StoreKey, ScoredReport)>> {
    let mut entries = Vec::new();
    for key in store.list().await? {
        if let Some(prefix) = prefix {
            if !key.to_string().starts_with(prefix) {
                continue;
            }
        }
        match store.get(&key).await {
            Ok(Some(report)) => entries.push((key, report)),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable report {}: {}", key, e),
        }
    }
    Ok(entries)
}

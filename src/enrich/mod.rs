//! Enrichment service.
//!
//! Takes a page report from the page context, adds the signals only the
//! background context can see (cookies for the host and the page's response
//! headers), scores the result and persists it.
//!
//! Cookie and header lookups degrade independently: a failed cookie lookup
//! scores as an empty list and a failed header probe as
//! [`HeaderProbeResult::Failure`]. Neither stops scoring or storage.

mod cookies;
mod headers;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::error_handling::StoreError;
use crate::models::{Cookie, HeaderProbeResult, PageReport, ScoredReport, TabId};
use crate::protocol::{Message, Notifier};
use crate::security::score_breakdown;
use crate::storage::{ReportStore, StoreKey};

pub use cookies::{domain_matches, parse_set_cookie, CookieJar, CookieSource, SetCookie};
pub use headers::{classify_headers, HeaderProbe, HttpHeaderProbe, OPAQUE_REASON};

/// Background-context pipeline from [`PageReport`] to stored [`ScoredReport`].
#[derive(Clone)]
pub struct Enricher {
    cookies: Arc<dyn CookieSource>,
    headers: Arc<dyn HeaderProbe>,
    store: ReportStore,
    notifier: Notifier,
    header_timeout: Duration,
}

impl Enricher {
    pub fn new(
        cookies: Arc<dyn CookieSource>,
        headers: Arc<dyn HeaderProbe>,
        store: ReportStore,
        notifier: Notifier,
        header_timeout: Duration,
    ) -> Self {
        Self {
            cookies,
            headers,
            store,
            notifier,
            header_timeout,
        }
    }

    /// Gathers cookies and headers concurrently and scores the report.
    /// Does not touch the store.
    pub async fn evaluate(&self, report: PageReport) -> ScoredReport {
        let (cookie_list, header_info) = tokio::join!(
            self.lookup_cookies(&report.hostname),
            self.headers.head_request(&report.url, self.header_timeout),
        );
        if let Some(reason) = header_info.failure_reason() {
            log::info!("Headers for {} unknown: {}", report.hostname, reason);
        }

        let breakdown = score_breakdown(&report, &cookie_list, &header_info);
        ScoredReport {
            cookie_count: cookie_list.len(),
            insecure_cookie_count: cookie_list.iter().filter(|c| !c.secure).count(),
            header_info,
            score: breakdown.score,
            last_updated: Utc::now().timestamp_millis(),
            penalties: breakdown.penalties,
            report,
        }
    }

    /// Evaluates `report`, writes it under its primary key and the
    /// `last_report_<hostname>` index, then publishes `REPORT_STORED`.
    ///
    /// A store failure loses this cycle's report and is returned; nothing is
    /// published in that case.
    pub async fn enrich(
        &self,
        report: PageReport,
        tab: Option<TabId>,
    ) -> Result<(StoreKey, ScoredReport), StoreError> {
        let key = StoreKey::primary(tab, &report.hostname);
        let scored = self.evaluate(report).await;

        self.store.put_with_index(&key, &scored).await.map_err(|e| {
            log::error!("Failed to store report {}: {}", key, e);
            e
        })?;
        log::info!(
            "Stored {} for {} with score {}",
            key,
            scored.report.hostname,
            scored.score
        );

        self.notifier.notify(Message::ReportStored {
            key: key.to_string(),
            data: scored.clone(),
        });
        Ok((key, scored))
    }

    async fn lookup_cookies(&self, hostname: &str) -> Vec<Cookie> {
        match self.cookies.get_cookies(hostname).await {
            Ok(cookies) => cookies,
            Err(e) => {
                log::warn!("Cookie lookup for {} failed, scoring with none: {}", hostname, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests;

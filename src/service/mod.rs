//! Background context: consumes page messages and runs enrichment.

use tokio::task::JoinSet;
use url::Url;

use crate::enrich::Enricher;
use crate::models::PageReport;
use crate::protocol::{Envelope, Inbox, Message};

/// Summary of one [`BackgroundService::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStats {
    /// Reports scored and stored.
    pub stored: usize,
    /// Reports scored but lost to a store failure.
    pub failed: usize,
    /// Envelopes dropped as invalid or not meant for the background.
    pub dropped: usize,
}

/// Handles `PAGE_REPORT` messages until the bus closes.
pub struct BackgroundService {
    enricher: Enricher,
}

impl BackgroundService {
    pub fn new(enricher: Enricher) -> Self {
        Self { enricher }
    }

    /// Runs until every sender on the bus is gone and every spawned
    /// enrichment has finished.
    ///
    /// Each `PAGE_REPORT` is enriched on its own task so a slow header probe
    /// never holds up the next report. A failure in one cycle is logged and
    /// does not stop the loop.
    pub async fn run(self, mut inbox: Inbox) -> ServiceStats {
        let mut stats = ServiceStats::default();
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                envelope = inbox.recv() => {
                    let Some(envelope) = envelope else { break };
                    match accept(envelope) {
                        Some((report, tab)) => {
                            let enricher = self.enricher.clone();
                            tasks.spawn(async move { enricher.enrich(report, tab).await });
                        }
                        None => stats.dropped += 1,
                    }
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    record(&mut stats, joined);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            record(&mut stats, joined);
        }
        log::debug!("Background service stopped: {:?}", stats);
        stats
    }
}

type EnrichOutcome = Result<
    (crate::storage::StoreKey, crate::models::ScoredReport),
    crate::error_handling::StoreError,
>;

fn record(stats: &mut ServiceStats, joined: Result<EnrichOutcome, tokio::task::JoinError>) {
    match joined {
        Ok(Ok(_)) => stats.stored += 1,
        Ok(Err(e)) => {
            // Already logged by the enricher; the report for this cycle is lost.
            log::debug!("Enrichment cycle failed: {}", e);
            stats.failed += 1;
        }
        Err(e) => {
            log::error!("Enrichment task panicked: {}", e);
            stats.failed += 1;
        }
    }
}

/// Picks out page reports that can be enriched.
fn accept(envelope: Envelope) -> Option<(PageReport, Option<crate::models::TabId>)> {
    match envelope.message {
        Message::PageReport { data } => {
            if data.hostname.is_empty() || Url::parse(&data.url).is_err() {
                log::warn!(
                    "Dropping PAGE_REPORT from tab {:?} with unusable url '{}'",
                    envelope.sender_tab,
                    data.url
                );
                return None;
            }
            Some((data, envelope.sender_tab))
        }
        other => {
            log::debug!("Background ignores {} messages", other.kind());
            None
        }
    }
}

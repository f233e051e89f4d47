//! Page context: loads the page, extracts signals, posts `PAGE_REPORT`.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::fetch_page;
use crate::enrich::CookieJar;
use crate::error_handling::{FetchError, ProtocolError};
use crate::extract::collect_page_report;
use crate::models::PageReport;
use crate::protocol::{Message, PagePort};
use crate::webrtc::PeerConnector;

/// Why an evaluation produced no `PAGE_REPORT`.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Evaluates one page and reports it to the background context.
pub struct PageAgent {
    client: Arc<reqwest::Client>,
    jar: Arc<CookieJar>,
    url: Url,
    connector: Option<Arc<dyn PeerConnector>>,
    webrtc_timeout: Duration,
}

impl PageAgent {
    pub fn new(
        client: Arc<reqwest::Client>,
        jar: Arc<CookieJar>,
        url: Url,
        connector: Option<Arc<dyn PeerConnector>>,
        webrtc_timeout: Duration,
    ) -> Self {
        Self {
            client,
            jar,
            url,
            connector,
            webrtc_timeout,
        }
    }

    /// Loads the page and builds its report.
    pub async fn evaluate(&self) -> Result<PageReport, FetchError> {
        let page = fetch_page(&self.client, &self.url, &self.jar).await?;
        Ok(collect_page_report(
            &page.body,
            &page.final_url,
            self.connector.as_deref(),
            self.webrtc_timeout,
        )
        .await)
    }

    /// Evaluates once and posts exactly one `PAGE_REPORT`.
    pub async fn scan_and_post(&self, port: &PagePort) -> Result<PageReport, AgentError> {
        let report = self.evaluate().await?;
        port.post(Message::PageReport {
            data: report.clone(),
        })
        .await?;
        log::debug!("Posted PAGE_REPORT for {}", report.hostname);
        Ok(report)
    }

    /// Scans on start and again on every `TRIGGER_SCAN` until the bus
    /// closes. Returns the number of reports posted.
    pub async fn run(self, mut port: PagePort) -> usize {
        let mut posted = 0;
        loop {
            match self.scan_and_post(&port).await {
                Ok(_) => posted += 1,
                Err(AgentError::Protocol(e)) => {
                    log::debug!("Page agent stopping: {}", e);
                    break;
                }
                Err(e) => log::warn!("Page evaluation of {} failed: {}", self.url, e),
            }
            if !port.next_trigger().await {
                break;
            }
        }
        posted
    }
}

//! Shared resources for one scan.

use std::sync::Arc;

use url::Url;

use crate::enrich::CookieJar;
use crate::storage::ReportStore;
use crate::webrtc::PeerConnector;

/// Everything a scan needs, built once by [`super::init::init_scan_resources`].
pub struct ScanResources {
    /// Normalized page URL.
    pub url: Url,
    /// Client for loading the page.
    pub client: Arc<reqwest::Client>,
    /// Client for the header probe. Its deadline comes from the probe itself.
    pub probe_client: Arc<reqwest::Client>,
    /// Filled by the page fetch, read by the enrichment service.
    pub cookie_jar: Arc<CookieJar>,
    pub store: ReportStore,
    /// `None` when the WebRTC probe is disabled.
    pub connector: Option<Arc<dyn PeerConnector>>,
}

//! Passive page signal extraction.
//!
//! This module turns a parsed document and its URL into a `PageReport`:
//! - Transport security and mixed content
//! - Insecure form actions and CSRF token inputs
//! - Inline scripts and inline event handlers
//! - Known tracker scripts
//! - Open-redirect-looking links
//!
//! Extraction only reads the document. Unparsable URLs met along the way are
//! skipped silently. WebRTC addresses are filled in afterwards by
//! `collect_page_report`, which is the only asynchronous step.

mod forms;
mod links;
mod resources;
mod selectors;

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use scraper::Html;
use url::Url;

use crate::config::{MAX_MIXED_RESOURCES, MAX_OPEN_REDIRECT_CANDIDATES};
use crate::models::PageReport;
use crate::webrtc::{self, PeerConnector};

pub use forms::{find_csrf_tokens, find_insecure_forms, CSRF_NAME_HINTS};
pub use links::{find_open_redirect_candidates, REDIRECT_PARAMS};
pub use resources::{
    count_inline_scripts, find_inline_event_handlers, find_mixed_resources, find_trackers,
    EVENT_HANDLER_ATTRIBUTES, KNOWN_TRACKERS,
};

/// De-duplicates items keeping document order, then keeps at most `cap`.
fn unique_capped<I>(items: I, cap: Option<usize>) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut kept = BTreeSet::new();
    for item in items {
        if cap.is_some_and(|cap| kept.len() >= cap) {
            break;
        }
        if seen.insert(item.clone()) {
            kept.insert(item);
        }
    }
    kept
}

/// Computes every `PageReport` field except `webrtc_ips`.
pub fn extract_page_signals(document: &Html, page_url: &Url) -> PageReport {
    let is_secure = page_url.scheme() == "https";

    // Mixed content only means something on a secure page.
    let mixed = if is_secure {
        find_mixed_resources(document, page_url)
    } else {
        Vec::new()
    };

    let report = PageReport {
        url: page_url.to_string(),
        hostname: page_url.host_str().unwrap_or_default().to_string(),
        is_secure,
        mixed_resources: unique_capped(mixed, Some(MAX_MIXED_RESOURCES)),
        insecure_forms: unique_capped(find_insecure_forms(document), None),
        inline_scripts: count_inline_scripts(document),
        inline_event_handlers: unique_capped(find_inline_event_handlers(document), None),
        trackers_found: unique_capped(find_trackers(document, page_url), None),
        csrf_tokens: unique_capped(find_csrf_tokens(document), None),
        open_redirect_candidates: unique_capped(
            find_open_redirect_candidates(document, page_url),
            Some(MAX_OPEN_REDIRECT_CANDIDATES),
        ),
        webrtc_ips: BTreeSet::new(),
    };

    log::debug!(
        "Extracted signals for {}: {} mixed, {} insecure forms, {} inline scripts, {} trackers, {} csrf inputs, {} redirect links",
        report.url,
        report.mixed_resources.len(),
        report.insecure_forms.len(),
        report.inline_scripts,
        report.trackers_found.len(),
        report.csrf_tokens.len(),
        report.open_redirect_candidates.len()
    );

    report
}

/// Builds the complete report for one evaluation: synchronous extraction
/// first, then the time-bounded WebRTC probe.
///
/// The parsed document is dropped before awaiting, so the returned future
/// is `Send`.
pub async fn collect_page_report(
    html: &str,
    page_url: &Url,
    connector: Option<&dyn PeerConnector>,
    webrtc_timeout: Duration,
) -> PageReport {
    let mut report = {
        let document = Html::parse_document(html);
        extract_page_signals(&document, page_url)
    };

    if let Some(connector) = connector {
        report.webrtc_ips = webrtc::probe(connector, webrtc_timeout).await;
    }

    report
}

//! Subresource and script signals: mixed content, inline code, trackers.

use scraper::Html;
use url::Url;

use super::selectors::{
    ANY_ELEMENT_SELECTOR, EXTERNAL_SCRIPT_SELECTOR, SCRIPT_SELECTOR, SUBRESOURCE_SELECTOR,
};

/// Inline event handler attributes that are looked for on every element.
pub const EVENT_HANDLER_ATTRIBUTES: &[&str] = &[
    "onerror",
    "onclick",
    "onload",
    "onmouseover",
    "onfocus",
    "onblur",
];

/// Hostname fragments of well-known tracking script hosts.
///
/// Matching is plain substring containment, so unrelated hosts that happen to
/// contain one of these fragments also match.
pub const KNOWN_TRACKERS: &[&str] = &[
    "google-analytics.com",
    "googletagmanager.com",
    "doubleclick.net",
    "facebook.net",
    "facebook.com",
    "ads.twitter.com",
];

/// Returns resolved `http:` subresource URLs in document order.
///
/// `link` elements contribute their `href`, everything else its `src`.
/// Callers only use this for secure pages.
pub fn find_mixed_resources(document: &Html, page_url: &Url) -> Vec<String> {
    document
        .select(&SUBRESOURCE_SELECTOR)
        .filter_map(|element| {
            let attr = if element.value().name() == "link" {
                "href"
            } else {
                "src"
            };
            let raw = element.value().attr(attr)?.trim();
            if raw.is_empty() {
                return None;
            }
            let resolved = page_url.join(raw).ok()?;
            (resolved.scheme() == "http").then(|| resolved.to_string())
        })
        .collect()
}

/// Counts `<script>` elements without a `src` whose body is not blank.
///
/// A `src` attribute makes a script external even when it is empty, since an
/// empty reference resolves to the document itself.
pub fn count_inline_scripts(document: &Html) -> usize {
    document
        .select(&SCRIPT_SELECTOR)
        .filter(|script| script.value().attr("src").is_none())
        .filter(|script| script.text().any(|chunk| !chunk.trim().is_empty()))
        .count()
}

/// Returns every inline handler attribute name seen, one entry per occurrence.
pub fn find_inline_event_handlers(document: &Html) -> Vec<String> {
    let mut found = Vec::new();
    for element in document.select(&ANY_ELEMENT_SELECTOR) {
        for attr in EVENT_HANDLER_ATTRIBUTES {
            if element.value().attr(attr).is_some() {
                found.push((*attr).to_string());
            }
        }
    }
    found
}

/// Returns third-party script hostnames that contain a known tracker fragment.
///
/// Script URLs that cannot be resolved are skipped.
pub fn find_trackers(document: &Html, page_url: &Url) -> Vec<String> {
    let page_host = page_url.host_str().unwrap_or_default();
    let mut found = Vec::new();
    for script in document.select(&EXTERNAL_SCRIPT_SELECTOR) {
        let Some(src) = script.value().attr("src") else {
            continue;
        };
        let Ok(resolved) = page_url.join(src.trim()) else {
            log::trace!("Skipping unparsable script src '{}'", src);
            continue;
        };
        let Some(host) = resolved.host_str() else {
            continue;
        };
        if host == page_host {
            continue;
        }
        for tracker in KNOWN_TRACKERS {
            if host.contains(tracker) {
                found.push(host.to_string());
            }
        }
    }
    found
}

//! Link signals: open-redirect candidates.

use scraper::Html;
use url::Url;

use super::selectors::LINK_SELECTOR;

/// Query parameter names that commonly carry a redirect target.
pub const REDIRECT_PARAMS: &[&str] = &["redirect", "url", "next", "dest", "destination"];

/// Returns raw `href` values whose redirect parameter points at another host.
///
/// A parameter value only counts when it is an absolute URL with a hostname
/// different from the page's. Relative targets, same-host targets and
/// unparsable links are skipped.
pub fn find_open_redirect_candidates(document: &Html, page_url: &Url) -> Vec<String> {
    let page_host = page_url.host_str().unwrap_or_default();
    let mut found = Vec::new();

    for link in document.select(&LINK_SELECTOR) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = page_url.join(href.trim()) else {
            continue;
        };
        for (key, value) in resolved.query_pairs() {
            if !REDIRECT_PARAMS.contains(&key.to_lowercase().as_str()) {
                continue;
            }
            let Ok(target) = Url::parse(&value) else {
                continue;
            };
            if target
                .host_str()
                .is_some_and(|host| !host.is_empty() && host != page_host)
            {
                found.push(href.to_string());
            }
        }
    }
    found
}

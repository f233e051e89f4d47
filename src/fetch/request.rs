//! Request building and response reading for the page under evaluation.

use reqwest::header::{HeaderMap, CONTENT_TYPE, LOCATION};
use url::Url;

use crate::config::{MAX_REDIRECT_HOPS, MAX_RESPONSE_BODY_SIZE};
use crate::enrich::CookieJar;
use crate::error_handling::FetchError;

/// Browser-like request headers so servers return the page a visitor would see.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        builder
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-dest"),
                "document",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-mode"),
                "navigate",
            )
            .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
    }
}

/// A page as loaded in the page context.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Location after redirects.
    pub final_url: Url,
    /// HTML source, empty when the response was not HTML.
    pub body: String,
}

/// Loads `url`, following redirects, and records the cookies every hop sets
/// in `jar`.
///
/// Redirects are followed here rather than by the client so that cookies set
/// on intermediate responses are seen. A client that follows redirects on its
/// own still works, but only its final response is inspected.
///
/// HTTP error statuses are not errors here: an error page is still a page.
/// Bodies over the size limit are cut at the limit.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &Url,
    jar: &CookieJar,
) -> Result<FetchedPage, FetchError> {
    let mut current = url.clone();
    let mut hops = 0;
    let response = loop {
        let request = RequestHeaders::apply_to_request_builder(client.get(current.clone()));
        let response = request.send().await.map_err(|source| FetchError::Request {
            url: current.to_string(),
            source,
        })?;
        record_cookies(jar, response.url(), response.headers());

        let Some(next) = redirect_target(&response) else {
            break response;
        };
        hops += 1;
        if hops > MAX_REDIRECT_HOPS {
            return Err(FetchError::TooManyRedirects {
                url: url.to_string(),
                limit: MAX_REDIRECT_HOPS,
            });
        }
        log::debug!("Redirect {} -> {} ({})", current, next, response.status());
        current = next;
    };

    let final_url = response.url().clone();
    log::debug!("Fetched {} -> {} ({})", url, final_url, response.status());

    if !is_html(response.headers()) {
        log::info!("{} is not HTML; evaluating an empty document", final_url);
        return Ok(FetchedPage {
            final_url,
            body: String::new(),
        });
    }

    let body = match response.text().await {
        Ok(text) => truncate_body(text),
        Err(e) => {
            log::warn!("Failed to read response body for {final_url}: {e}");
            String::new()
        }
    };
    log::debug!("Body length for {final_url}: {} bytes", body.len());

    Ok(FetchedPage { final_url, body })
}

fn record_cookies(jar: &CookieJar, url: &Url, headers: &HeaderMap) {
    if let Some(host) = url.host_str() {
        let stored = jar.store_response_cookies(headers, host);
        if stored > 0 {
            log::debug!("Recorded {} cookies from {}", stored, host);
        }
    }
}

/// Where a 3xx response points, resolved against the response URL.
fn redirect_target(response: &reqwest::Response) -> Option<Url> {
    if !response.status().is_redirection() {
        return None;
    }
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    response.url().join(location).ok()
}

/// A missing Content-Type is given the benefit of the doubt.
fn is_html(headers: &HeaderMap) -> bool {
    match headers.get(CONTENT_TYPE) {
        Some(ct) => {
            let ct = ct.to_str().unwrap_or("").to_ascii_lowercase();
            ct.starts_with("text/html") || ct.starts_with("application/xhtml+xml")
        }
        None => true,
    }
}

fn truncate_body(mut text: String) -> String {
    if text.len() > MAX_RESPONSE_BODY_SIZE {
        log::debug!("Truncating {} byte body", text.len());
        let mut cut = MAX_RESPONSE_BODY_SIZE;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}

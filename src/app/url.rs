//! URL validation and normalization.

use url::Url;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::FetchError;

/// Validates and normalizes a page URL given on the command line.
///
/// Adds `https://` when no `scheme://` is present, then requires an http(s)
/// URL with a host. Any other explicit scheme is rejected. Overlong input is rejected before and after normalization.
pub fn validate_and_normalize_url(url: &str) -> Result<Url, FetchError> {
    let url = url.trim();
    if url.len() > MAX_URL_LENGTH {
        return Err(FetchError::InvalidUrl(format!(
            "{}... exceeds {} characters",
            url.chars().take(50).collect::<String>(),
            MAX_URL_LENGTH
        )));
    }

    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };
    if normalized.len() > MAX_URL_LENGTH {
        return Err(FetchError::InvalidUrl(format!(
            "normalized URL exceeds {} characters",
            MAX_URL_LENGTH
        )));
    }

    let parsed = Url::parse(&normalized).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
    match (parsed.scheme(), parsed.host_str()) {
        ("http" | "https", Some(host)) if !host.is_empty() => Ok(parsed),
        _ => Err(FetchError::InvalidUrl(format!("{url}: unsupported scheme or missing host"))),
    }
}

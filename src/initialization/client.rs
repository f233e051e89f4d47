//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{redirect, ClientBuilder};

use crate::config::{Config, TCP_CONNECT_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used to fetch the page under evaluation.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config
/// - Fetch timeout and a shorter connect timeout
/// - Automatic redirects disabled, so the fetcher can see every hop's cookies
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(config.fetch_timeout)
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .redirect(redirect::Policy::none())
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the HTTP client used by the header probe.
///
/// No client-level timeout is set: the probe enforces its own deadline and
/// drops the in-flight request when it elapses.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_probe_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including probe deadlines, extraction caps and store key prefixes.

use std::time::Duration;

// Probe deadlines
/// Deadline for the response header probe in milliseconds
pub const HEADER_CHECK_TIMEOUT_MS: u64 = 3000;
/// Deadline for ICE candidate gathering in milliseconds
pub const WEBRTC_PROBE_TIMEOUT_MS: u64 = 2000;
/// Per-request timeout for fetching the page itself
pub const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Redirect hops followed when loading the page
pub const MAX_REDIRECT_HOPS: usize = 10;
/// How long `scan` waits for the stored notification before pulling from the store
pub const REPORT_WAIT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Response and body size limits
/// Maximum page body size in bytes (2MB)
/// Larger bodies are truncated before parsing
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;
/// Maximum number of response headers kept from a probe
pub const MAX_HEADER_COUNT: usize = 100;
/// Maximum URL length accepted on the command line
pub const MAX_URL_LENGTH: usize = 2048;

// Extraction caps (applied after de-duplication)
/// Maximum mixed-content URLs kept in a report
pub const MAX_MIXED_RESOURCES: usize = 20;
/// Maximum open-redirect candidate links kept in a report
pub const MAX_OPEN_REDIRECT_CANDIDATES: usize = 10;

// Message bus sizing
/// Pending page reports the background context will queue
pub const PAGE_REPORT_CHANNEL_CAPACITY: usize = 64;
/// Notifications a slow presentation subscriber may fall behind by before losing some
pub const NOTIFY_CHANNEL_CAPACITY: usize = 16;

// Report store keys
/// Key prefix for reports addressed by tab
pub const KEY_PREFIX_TAB: &str = "report_tab_";
/// Key prefix for reports addressed by hostname when no tab is known
pub const KEY_PREFIX_HOST: &str = "report_host_";
/// Key prefix of the per-hostname "latest report" index
pub const KEY_PREFIX_LAST: &str = "last_report_";

/// Default SQLite database path for the report store
pub const DB_PATH: &str = "./page_hygiene.db";

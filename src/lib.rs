//! page_hygiene library: page security hygiene scoring
//!
//! This library inspects a web page for common security hygiene issues
//! (mixed content, insecure forms, inline scripts, trackers, missing CSRF
//! tokens, open-redirect parameters, WebRTC address leaks, cookie flags and
//! security response headers) and reduces them to a 0-100 risk score.
//!
//! The pipeline mirrors a browser extension's split into contexts that only
//! talk through messages:
//! - the page context ([`fetch::PageAgent`]) extracts passive signals and
//!   posts a `PAGE_REPORT`
//! - the background context ([`service::BackgroundService`]) adds cookies and
//!   response headers, scores the result and stores it
//! - the presentation layer reads the store or listens for `REPORT_STORED`
//!
//! # Example
//!
//! ```no_run
//! use page_hygiene::{run_scan, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     url: "https://example.com".to_string(),
//!     enable_webrtc: false,
//!     ..Default::default()
//! };
//!
//! let outcome = run_scan(config).await?;
//! println!("{} scored {}", outcome.key, outcome.report.score);
//! # Ok(())
//! # }
//! ```
//!
//! Scoring on its own needs no runtime:
//!
//! ```
//! use page_hygiene::models::{HeaderProbeResult, PageReport, ProbeFailureKind};
//! use page_hygiene::security::score;
//!
//! let report = PageReport {
//!     url: "http://example.com/".to_string(),
//!     hostname: "example.com".to_string(),
//!     is_secure: false,
//!     ..Default::default()
//! };
//! let headers = HeaderProbeResult::failure(ProbeFailureKind::Timeout, "timed out after 3000ms");
//! assert_eq!(score(&report, &[], &headers), 57);
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime for everything except scoring and
//! extraction.

pub mod app;
pub mod config;
pub mod enrich;
pub mod error_handling;
pub mod extract;
pub mod fetch;
pub mod initialization;
pub mod models;
pub mod protocol;
pub mod security;
pub mod service;
pub mod storage;
pub mod webrtc;

mod run;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use models::{Cookie, HeaderProbeResult, PageReport, ScoredReport, TabId};
pub use run::{
    find_report, init_scan_resources, list_reports, open_report_store, run_scan,
    scan_with_resources, ScanOutcome, ScanResources,
};
pub use security::{score, score_breakdown};

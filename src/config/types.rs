//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_USER_AGENT, HEADER_CHECK_TIMEOUT_MS, PAGE_FETCH_TIMEOUT,
    WEBRTC_PROBE_TIMEOUT_MS,
};
use crate::models::TabId;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line interface.
///
/// # Examples
///
/// ```bash
/// # Scan a page and print its score
/// page_hygiene scan https://example.com
///
/// # Scan as tab 7, keeping the result in a custom database
/// page_hygiene --db-path ./reports.db scan https://example.com --tab-id 7
///
/// # Pull the latest stored report for a host
/// page_hygiene show example.com
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "page_hygiene",
    about = "Scores a web page for common security hygiene issues."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Report store path (SQLite file)
    #[arg(long, global = true, value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a page and store the scored report
    Scan(ScanArgs),
    /// Print a stored report by key or hostname
    Show(ShowArgs),
    /// List stored reports
    List(ListArgs),
}

/// Options for `scan`.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Page URL (https:// is assumed when no scheme is given)
    pub url: String,

    /// Tab identity to store the report under (defaults to a hostname key)
    #[arg(long)]
    pub tab_id: Option<u64>,

    /// Page fetch timeout in seconds
    #[arg(long, default_value_t = PAGE_FETCH_TIMEOUT.as_secs())]
    pub timeout_seconds: u64,

    /// Header probe deadline in milliseconds
    #[arg(long, default_value_t = HEADER_CHECK_TIMEOUT_MS)]
    pub header_timeout_ms: u64,

    /// ICE candidate gathering deadline in milliseconds
    #[arg(long, default_value_t = WEBRTC_PROBE_TIMEOUT_MS)]
    pub webrtc_timeout_ms: u64,

    /// Skip the WebRTC address probe
    #[arg(long)]
    pub no_webrtc: bool,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Print the stored report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Options for `show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Store key (e.g. `report_tab_7`) or a bare hostname
    pub key: String,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for `list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only list keys starting with this prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

/// Library configuration for a scan (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use page_hygiene::Config;
///
/// let config = Config {
///     url: "https://example.com".to_string(),
///     enable_webrtc: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Page to evaluate
    pub url: String,

    /// Tab identity for the primary store key
    pub tab_id: Option<TabId>,

    /// Report store path (SQLite file)
    pub db_path: PathBuf,

    /// Page fetch timeout
    pub fetch_timeout: Duration,

    /// Header probe deadline
    pub header_timeout: Duration,

    /// ICE candidate gathering deadline
    pub webrtc_timeout: Duration,

    /// Whether to run the WebRTC address probe
    pub enable_webrtc: bool,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            tab_id: None,
            db_path: PathBuf::from(DB_PATH),
            fetch_timeout: PAGE_FETCH_TIMEOUT,
            header_timeout: Duration::from_millis(HEADER_CHECK_TIMEOUT_MS),
            webrtc_timeout: Duration::from_millis(WEBRTC_PROBE_TIMEOUT_MS),
            enable_webrtc: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Builds a scan configuration from parsed `scan` arguments.
    pub fn from_scan_args(args: &ScanArgs, db_path: PathBuf) -> Self {
        Self {
            url: args.url.clone(),
            tab_id: args.tab_id.map(TabId),
            db_path,
            fetch_timeout: Duration::from_secs(args.timeout_seconds),
            header_timeout: Duration::from_millis(args.header_timeout_ms),
            webrtc_timeout: Duration::from_millis(args.webrtc_timeout_ms),
            enable_webrtc: !args.no_webrtc,
            user_agent: args.user_agent.clone(),
        }
    }
}

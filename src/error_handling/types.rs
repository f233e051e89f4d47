//! Error type definitions.
//!
//! Degraded signals (cookies, headers, WebRTC) never surface here: they are
//! absorbed where they happen and show up as empty or `Failure` values.
//! These types cover the failures that do stop an operation.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for report store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreation(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be encoded or decoded.
    #[error("Stored value for '{key}' is not a valid report: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Error types for fetching the page that is being evaluated.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL was rejected before any request was made.
    #[error("Invalid page URL '{0}'")]
    InvalidUrl(String),

    /// The request itself failed.
    #[error("Request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The redirect chain did not settle within the hop limit.
    #[error("Too many redirects loading {url} (limit {limit})")]
    TooManyRedirects { url: String, limit: usize },
}

/// Error types raised at the message boundary.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The payload is not JSON or does not match any known message kind.
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The receiving side has gone away.
    #[error("Message channel closed")]
    ChannelClosed,
}

/// Errors from the WebRTC candidate source.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The peer connection (or its local sockets) could not be created.
    #[error("Peer connection setup failed: {0}")]
    Setup(#[from] std::io::Error),
}

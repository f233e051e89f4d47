//! Error handling.
//!
//! Errors are split by concern:
//! - **Initialization**: logger and HTTP client setup
//! - **Store**: report store persistence (fatal for the cycle, isolated)
//! - **Fetch**: acquiring the page under evaluation
//! - **Protocol**: malformed messages at the context boundary
//! - **Probe**: WebRTC setup failures, always absorbed into an empty result

mod types;

// Re-export public API
pub use types::{FetchError, InitializationError, ProbeError, ProtocolError, StoreError};

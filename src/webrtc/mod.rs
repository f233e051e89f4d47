//! Best-effort WebRTC address leak probe.
//!
//! A peer connection with no STUN or relay servers is opened and its ICE
//! candidates are collected until gathering signals completion or the
//! deadline passes, whichever comes first. Every IP-like address found in a
//! candidate line ends up in the result.
//!
//! The probe never fails: if the connection cannot be built the result is
//! simply empty. The connection is closed on every exit path, including
//! when the caller drops the probe future midway.

mod candidates;
mod local;
mod scripted;

use std::collections::BTreeSet;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::error_handling::ProbeError;

pub use candidates::extract_ips;
pub use local::LocalInterfaceConnector;
pub use scripted::ScriptedConnector;

/// An open peer connection that is gathering ICE candidates.
pub trait PeerConnection: Send {
    /// Resolves to the next candidate line, or `None` once gathering is complete.
    fn next_candidate(&mut self) -> BoxFuture<'_, Option<String>>;

    /// Releases the connection. Must be idempotent.
    fn close(&mut self);
}

/// Creates peer connections configured without ICE servers, with a data
/// channel requested so that candidate gathering starts.
pub trait PeerConnector: Send + Sync {
    fn open(&self) -> Result<Box<dyn PeerConnection>, ProbeError>;
}

/// Closes the wrapped connection when dropped.
struct ConnectionGuard(Box<dyn PeerConnection>);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Collects IP-like addresses from ICE candidates within `timeout`.
pub async fn probe(connector: &dyn PeerConnector, timeout: Duration) -> BTreeSet<String> {
    let mut guard = match connector.open() {
        Ok(connection) => ConnectionGuard(connection),
        Err(e) => {
            log::debug!("WebRTC probe unavailable: {}", e);
            return BTreeSet::new();
        }
    };

    let mut ips = BTreeSet::new();
    let gathering = async {
        while let Some(candidate) = guard.0.next_candidate().await {
            log::trace!("ICE candidate: {}", candidate);
            ips.extend(extract_ips(&candidate));
        }
    };

    if tokio::time::timeout(timeout, gathering).await.is_err() {
        log::debug!(
            "WebRTC candidate gathering hit its {}ms deadline",
            timeout.as_millis()
        );
    }
    drop(guard);

    ips
}

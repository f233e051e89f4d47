//! Candidate source that replays a fixed script of candidate lines.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;

use super::{PeerConnection, PeerConnector};
use crate::error_handling::ProbeError;

/// Replays candidate lines, then either signals completion or stalls.
///
/// Useful for offline runs and for exercising the probe's deadline: a
/// stalling script never sends the terminal event, so only the timeout ends
/// gathering.
#[derive(Debug, Default)]
pub struct ScriptedConnector {
    lines: Vec<String>,
    stall_after_script: bool,
    fail_to_open: bool,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    /// Emits `lines` followed by the terminal event.
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Default::default()
        }
    }

    /// Emits `lines` and then never completes gathering.
    pub fn stalling(lines: Vec<String>) -> Self {
        Self {
            lines,
            stall_after_script: true,
            ..Default::default()
        }
    }

    /// Fails to construct a connection.
    pub fn failing() -> Self {
        Self {
            fail_to_open: true,
            ..Default::default()
        }
    }

    /// True once every opened connection has been closed.
    pub fn was_closed(&self) -> bool {
        let opened = self.opened.load(Ordering::SeqCst);
        opened > 0 && self.closed.load(Ordering::SeqCst) == opened
    }

    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Connections opened but not yet closed.
    pub fn leaked(&self) -> usize {
        self.opened.load(Ordering::SeqCst) - self.closed.load(Ordering::SeqCst)
    }
}

impl PeerConnector for ScriptedConnector {
    fn open(&self) -> Result<Box<dyn PeerConnection>, ProbeError> {
        if self.fail_to_open {
            return Err(ProbeError::Setup(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "peer connections are disabled",
            )));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedConnection {
            pending: self.lines.iter().cloned().collect(),
            stall_after_script: self.stall_after_script,
            closed: Arc::clone(&self.closed),
            is_closed: false,
        }))
    }
}

struct ScriptedConnection {
    pending: VecDeque<String>,
    stall_after_script: bool,
    closed: Arc<AtomicUsize>,
    is_closed: bool,
}

impl PeerConnection for ScriptedConnection {
    fn next_candidate(&mut self) -> BoxFuture<'_, Option<String>> {
        let next = self.pending.pop_front();
        let stall = next.is_none() && self.stall_after_script;
        Box::pin(async move {
            if stall {
                futures::future::pending::<()>().await;
            }
            next
        })
    }

    fn close(&mut self) {
        if !self.is_closed {
            self.is_closed = true;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

//! In-process message bus.
//!
//! Three channels stand in for the extension messaging transport:
//! - page -> background: bounded `mpsc` of [`Envelope`]s, fire-and-forget
//! - background -> presentation: `broadcast` of `REPORT_STORED`; lossy, so a
//!   subscriber that lags or is absent misses notifications and must pull
//!   from the report store instead
//! - presentation -> page: a `watch` counter bumped by each `TRIGGER_SCAN`

use tokio::sync::{broadcast, mpsc, watch};

use super::{Envelope, Message};
use crate::config::{NOTIFY_CHANNEL_CAPACITY, PAGE_REPORT_CHANNEL_CAPACITY};
use crate::error_handling::ProtocolError;
use crate::models::TabId;

/// Sending side shared by every context. Cheap to clone.
///
/// The background [`Inbox`] closes once every `MessageBus` and [`PagePort`]
/// has been dropped.
#[derive(Debug, Clone)]
pub struct MessageBus {
    outbound: mpsc::Sender<Envelope>,
    notifier: Notifier,
    triggers: std::sync::Arc<watch::Sender<u64>>,
}

/// Receiving end of the page -> background channel.
#[derive(Debug)]
pub struct Inbox {
    inbound: mpsc::Receiver<Envelope>,
}

impl Inbox {
    /// Next envelope, or `None` once all senders are gone.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.inbound.recv().await
    }
}

impl MessageBus {
    pub fn new() -> (Self, Inbox) {
        let (outbound, inbound) = mpsc::channel(PAGE_REPORT_CHANNEL_CAPACITY);
        let (notify_tx, _) = broadcast::channel(NOTIFY_CHANNEL_CAPACITY);
        let (triggers, _) = watch::channel(0);
        (
            Self {
                outbound,
                notifier: Notifier { sender: notify_tx },
                triggers: std::sync::Arc::new(triggers),
            },
            Inbox { inbound },
        )
    }

    /// Port for a page context identified by `tab`.
    pub fn page_port(&self, tab: Option<TabId>) -> PagePort {
        PagePort {
            tab,
            outbound: self.outbound.clone(),
            triggers: self.triggers.subscribe(),
        }
    }

    /// Handle the background context publishes notifications through.
    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    /// Subscribes to `REPORT_STORED` notifications sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.notifier.sender.subscribe()
    }

    /// Asks every page port to evaluate again.
    pub fn trigger_scan(&self) {
        self.triggers.send_modify(|generation| *generation += 1);
    }

    /// Delivers a raw JSON message from `sender_tab` to the background.
    ///
    /// The payload is validated here; malformed input never reaches the inbox.
    pub async fn send_json(
        &self,
        sender_tab: Option<TabId>,
        payload: &str,
    ) -> Result<(), ProtocolError> {
        let message = Message::from_json(payload).map_err(|e| {
            log::warn!("Dropping malformed message from tab {:?}: {}", sender_tab, e);
            e
        })?;
        self.outbound
            .send(Envelope {
                sender_tab,
                message,
            })
            .await
            .map_err(|_| ProtocolError::ChannelClosed)
    }
}

/// Page context end of the bus.
#[derive(Debug)]
pub struct PagePort {
    tab: Option<TabId>,
    outbound: mpsc::Sender<Envelope>,
    triggers: watch::Receiver<u64>,
}

impl PagePort {
    pub fn tab(&self) -> Option<TabId> {
        self.tab
    }

    /// Sends `message` to the background. No reply is expected.
    pub async fn post(&self, message: Message) -> Result<(), ProtocolError> {
        self.outbound
            .send(Envelope {
                sender_tab: self.tab,
                message,
            })
            .await
            .map_err(|_| ProtocolError::ChannelClosed)
    }

    /// Waits for the next `TRIGGER_SCAN`. Several triggers sent before this
    /// is polled collapse into one. Returns `false` once the bus is gone.
    pub async fn next_trigger(&mut self) -> bool {
        self.triggers.changed().await.is_ok()
    }
}

/// Publishes `REPORT_STORED` notifications to whoever is listening.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Message>,
}

impl Notifier {
    /// Publishes `message`, returning how many subscribers received it.
    /// Having nobody listening is normal and not an error.
    pub fn notify(&self, message: Message) -> usize {
        match self.sender.send(message) {
            Ok(receivers) => receivers,
            Err(_) => {
                log::debug!("No presentation subscribers for notification");
                0
            }
        }
    }
}

//! Message protocol between execution contexts.
//!
//! Contexts share no memory. The page context posts `PAGE_REPORT`, the
//! background context answers with a `REPORT_STORED` broadcast, and the
//! presentation layer may send `TRIGGER_SCAN` back to the page.

mod bus;
mod message;

pub use bus::{Inbox, MessageBus, Notifier, PagePort};
pub use message::{Envelope, Message};

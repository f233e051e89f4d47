//! Messages exchanged between the page, background and presentation contexts.

use serde::{Deserialize, Serialize};

use crate::error_handling::ProtocolError;
use crate::models::{PageReport, ScoredReport, TabId};

/// A message crossing a context boundary, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Page context -> background: one evaluation's passive signals.
    PageReport { data: PageReport },
    /// Background -> presentation: a scored report was written under `key`.
    ReportStored { key: String, data: ScoredReport },
    /// Presentation -> page: evaluate again.
    TriggerScan,
}

impl Message {
    /// Parses and validates a message received as JSON.
    ///
    /// Unknown `type` values and payloads that do not match their kind are
    /// rejected here, before anything reaches the enrichment pipeline.
    pub fn from_json(payload: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Wire name of the message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::PageReport { .. } => "PAGE_REPORT",
            Message::ReportStored { .. } => "REPORT_STORED",
            Message::TriggerScan => "TRIGGER_SCAN",
        }
    }
}

/// A message together with the identity of the tab that sent it, when known.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub sender_tab: Option<TabId>,
    pub message: Message,
}

//! Logged conversation records.

use chrono::Utc;
use relay_protocol::{now_millis, HistoryEntry, Sender};
use serde::{Deserialize, Serialize};

/// One logged conversation event, stored as a single JSON line.
///
/// Field names keep the relay's historical column layout, so `client_ip`
/// holds the originating address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Wall-clock time of the event, RFC 3339.
    pub date: String,

    /// Who produced the message.
    pub sender: Sender,

    /// Message text.
    pub message: String,

    /// Session id active when the row was recorded.
    pub client_id: String,

    /// Originating client address.
    pub client_ip: String,

    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl ConversationRecord {
    /// Create a record stamped with the current wall-clock time.
    pub fn now(
        sender: Sender,
        message: impl Into<String>,
        client_id: impl Into<String>,
        client_ip: impl Into<String>,
    ) -> Self {
        Self {
            date: Utc::now().to_rfc3339(),
            sender,
            message: message.into(),
            client_id: client_id.into(),
            client_ip: client_ip.into(),
            timestamp: now_millis(),
        }
    }

    /// Convert to the wire shape used in history replay.
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            sender: self.sender,
            message: self.message.clone(),
            timestamp: self.date.clone(),
            client_id: self.client_id.clone(),
        }
    }
}

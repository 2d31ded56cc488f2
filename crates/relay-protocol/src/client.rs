//! Inbound client messages.

use serde::{Deserialize, Serialize};

/// Sentinel marking a history-sync request, accepted either as the declared
/// `type` or as the message content itself.
pub const SYNC_HISTORY: &str = "sync_history";

/// A message received from a client.
///
/// Clients send loose JSON; every field defaults so that a bare
/// `{"message": "hi"}` (or even `{}`) parses. Anything that is not a
/// history-sync request is treated as chat text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessage {
    /// Declared message type, if any.
    #[serde(default)]
    pub r#type: Option<String>,

    /// Chat text. Missing means empty.
    #[serde(default)]
    pub message: String,

    /// Client-declared send time (milliseconds since epoch).
    #[serde(default)]
    pub timestamp: Option<u64>,
}

impl ClientMessage {
    /// Parse one raw text frame.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Whether this frame asks for history replay.
    pub fn is_history_sync(&self) -> bool {
        self.r#type.as_deref() == Some(SYNC_HISTORY) || self.message == SYNC_HISTORY
    }
}

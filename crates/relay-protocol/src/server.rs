//! Outbound server messages.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::sender::Sender;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// One replayed conversation row inside a `conversation_history` frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Who originally produced the row.
    pub sender: Sender,

    /// The message text.
    pub message: String,

    /// The row's recorded wall-clock time (RFC 3339 string).
    pub timestamp: String,

    /// Session id the row was recorded under.
    pub client_id: String,
}

/// A message sent to a client, tagged on the wire by `type`.
///
/// Every variant carries an epoch-millisecond `timestamp` stamped when the
/// message was built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Direct reply to a chat message, e.g. the echo fallback or the
    /// connect-time greeting.
    BotResponse {
        message: String,
        timestamp: u64,
        /// The inbound text being echoed, when there is one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original_message: Option<String>,
    },

    /// Conversational answer produced by a classification rule.
    ChatAnswer { message: String, timestamp: u64 },

    /// Ask the client to open a URL in a new tab.
    OpenTab {
        url: String,
        message: String,
        timestamp: u64,
    },

    /// Relay-level notice: malformed-payload errors and the shutdown
    /// broadcast.
    SystemMessage { message: String, timestamp: u64 },

    /// History replay for the requesting client's address.
    ConversationHistory {
        history: Vec<HistoryEntry>,
        timestamp: u64,
    },
}

impl ServerMessage {
    /// Build a `bot_response`, optionally carrying the original text.
    pub fn bot_response(message: impl Into<String>, original: Option<String>) -> Self {
        Self::BotResponse {
            message: message.into(),
            timestamp: now_millis(),
            original_message: original,
        }
    }

    /// Build a `chat_answer`.
    pub fn chat_answer(message: impl Into<String>) -> Self {
        Self::ChatAnswer {
            message: message.into(),
            timestamp: now_millis(),
        }
    }

    /// Build an `open_tab` request.
    pub fn open_tab(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenTab {
            url: url.into(),
            message: message.into(),
            timestamp: now_millis(),
        }
    }

    /// Build a `system_message` notice.
    pub fn system_message(message: impl Into<String>) -> Self {
        Self::SystemMessage {
            message: message.into(),
            timestamp: now_millis(),
        }
    }

    /// Build a `conversation_history` reply.
    pub fn conversation_history(history: Vec<HistoryEntry>) -> Self {
        Self::ConversationHistory {
            history,
            timestamp: now_millis(),
        }
    }
}

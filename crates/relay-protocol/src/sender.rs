//! Sender categories for conversation traffic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who produced a logged or replayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// A connected client.
    User,
    /// The assistant persona.
    Bot,
    /// Relay lifecycle events: connects, disconnects, tab opens, shutdown
    /// notices.
    System,
}

impl Sender {
    /// Whether this category belongs in history replay.
    ///
    /// Replay carries the conversation itself; `system` rows are connection
    /// noise and are filtered out.
    pub fn is_conversational(self) -> bool {
        matches!(self, Sender::User | Sender::Bot)
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sender::User => "user",
            Sender::Bot => "bot",
            Sender::System => "system",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
        assert_eq!(
            serde_json::to_string(&Sender::System).unwrap(),
            "\"system\""
        );
    }

    #[test]
    fn test_roundtrip() {
        let sender: Sender = serde_json::from_str("\"bot\"").unwrap();
        assert_eq!(sender, Sender::Bot);
    }

    #[test]
    fn test_conversational_excludes_system() {
        assert!(Sender::User.is_conversational());
        assert!(Sender::Bot.is_conversational());
        assert!(!Sender::System.is_conversational());
    }

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Bot.to_string(), "bot");
        assert_eq!(Sender::System.to_string(), "system");
    }
}

//! Response construction for classified chat messages.

use rand::seq::SliceRandom;
use relay_protocol::ServerMessage;

use crate::classify::{classify, Category};
use crate::navigation::find_url;

/// Canned freelance advice; one entry is chosen at random per request.
const ADVICE: &[&str] = &[
    "As a freelancer, building a strong portfolio is crucial. Make sure to showcase your best work and client testimonials!",
    "Time management is key in freelance work. Consider using tools like Toggl or Clockify to track your time effectively.",
    "Don't undervalue your work! Research market rates and price your services competitively but fairly.",
    "Building long-term client relationships is more valuable than one-off projects. Focus on delivering exceptional service!",
    "Always have a clear contract before starting any project. This protects both you and your client.",
    "Diversify your income streams - don't rely on just one client or platform for all your work.",
    "Keep learning new skills to stay competitive. The freelance market is always evolving!",
];

/// Capability summary for help requests.
const HELP_TEXT: &str = "Here's what I can help you with:\n\n\
- Website navigation: say \"open LinkedIn\", \"go to GitHub\", \"visit Upwork\", and more\n\
- Freelance support: ask about freelance work, projects, or clients\n\
- Offers: ask about job offers or opportunities\n\
- General chat: I'll respond to your messages and questions\n\n\
Try saying: \"open GitHub\", \"help me with freelance work\", or \"show me job offers\"!";

/// Clarification when no site keyword matches a navigation request.
const NAVIGATION_FALLBACK: &str = "I'd be happy to help you open a website! I can open popular \
freelance platforms like Upwork, Fiverr, LinkedIn, GitHub, and more. Which site would you like \
to visit?";

/// Builds the outbound replies for one chat message.
#[derive(Debug, Clone, Default)]
pub struct Responder {
    /// Number of job offers reported as loaded by offer inquiries.
    offer_count: usize,
}

impl Responder {
    /// Create a responder with no offers loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the offer count reported by offer inquiries.
    pub fn with_offer_count(mut self, count: usize) -> Self {
        self.offer_count = count;
        self
    }

    /// Produce the ordered replies for one chat message.
    ///
    /// Every category yields exactly one reply, except a matched navigation
    /// request which yields an `open_tab` followed by a `chat_answer`.
    pub fn respond(&self, text: &str) -> Vec<ServerMessage> {
        match classify(text) {
            Category::Navigation => self.navigate(text),
            Category::Help => vec![ServerMessage::chat_answer(HELP_TEXT)],
            Category::Freelance => vec![ServerMessage::chat_answer(format!(
                "Great question about freelancing! {}",
                random_advice()
            ))],
            Category::Offers => vec![ServerMessage::chat_answer(self.offers_summary())],
            Category::Echo => vec![ServerMessage::bot_response(
                format!("Echo: {text}"),
                Some(text.to_string()),
            )],
        }
    }

    fn navigate(&self, text: &str) -> Vec<ServerMessage> {
        match find_url(text) {
            Some(url) => vec![
                ServerMessage::open_tab(url, format!("Opening {url} for you!")),
                ServerMessage::chat_answer(format!(
                    "I've opened {url} in a new tab. Is there anything specific you'd like to do there?"
                )),
            ],
            None => vec![ServerMessage::chat_answer(NAVIGATION_FALLBACK)],
        }
    }

    fn offers_summary(&self) -> String {
        if self.offer_count > 0 {
            format!(
                "I have {} job offers available! You can view detailed information about each \
                 offer through the offers system.",
                self.offer_count
            )
        } else {
            "I don't have any job offers loaded at the moment. The offers system can help you \
             discover and manage freelance opportunities when available."
                .to_string()
        }
    }
}

fn random_advice() -> &'static str {
    let mut rng = rand::thread_rng();
    ADVICE.choose(&mut rng).copied().unwrap_or(ADVICE[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_match_sends_tab_then_followup() {
        let replies = Responder::new().respond("open github");
        assert_eq!(replies.len(), 2);
        match &replies[0] {
            ServerMessage::OpenTab { url, message, .. } => {
                assert_eq!(url, "https://github.com");
                assert!(message.contains("https://github.com"));
            }
            other => panic!("expected open_tab, got {other:?}"),
        }
        match &replies[1] {
            ServerMessage::ChatAnswer { message, .. } => {
                assert!(message.contains("https://github.com"));
            }
            other => panic!("expected chat_answer, got {other:?}"),
        }
    }

    #[test]
    fn test_navigation_miss_sends_single_clarification() {
        let replies = Responder::new().respond("open somewhere");
        assert_eq!(replies.len(), 1);
        assert!(matches!(&replies[0], ServerMessage::ChatAnswer { .. }));
    }

    #[test]
    fn test_help_summary() {
        let replies = Responder::new().respond("what can you do");
        assert_eq!(replies.len(), 1);
        match &replies[0] {
            ServerMessage::ChatAnswer { message, .. } => {
                assert!(message.contains("Website navigation"));
            }
            other => panic!("expected chat_answer, got {other:?}"),
        }
    }

    #[test]
    fn test_freelance_advice_from_list() {
        let replies = Responder::new().respond("freelance tips");
        assert_eq!(replies.len(), 1);
        match &replies[0] {
            ServerMessage::ChatAnswer { message, .. } => {
                assert!(message.starts_with("Great question about freelancing!"));
                assert!(ADVICE.iter().any(|advice| message.contains(advice)));
            }
            other => panic!("expected chat_answer, got {other:?}"),
        }
    }

    #[test]
    fn test_offers_with_count() {
        let replies = Responder::new().with_offer_count(3).respond("any offers?");
        match &replies[0] {
            ServerMessage::ChatAnswer { message, .. } => {
                assert!(message.contains("3 job offers"));
            }
            other => panic!("expected chat_answer, got {other:?}"),
        }
    }

    #[test]
    fn test_offers_empty_fallback() {
        let replies = Responder::new().respond("any offers?");
        match &replies[0] {
            ServerMessage::ChatAnswer { message, .. } => {
                assert!(message.contains("don't have any job offers"));
            }
            other => panic!("expected chat_answer, got {other:?}"),
        }
    }

    #[test]
    fn test_echo_carries_original() {
        let replies = Responder::new().respond("hello there");
        assert_eq!(replies.len(), 1);
        match &replies[0] {
            ServerMessage::BotResponse {
                message,
                original_message,
                ..
            } => {
                assert_eq!(message, "Echo: hello there");
                assert_eq!(original_message.as_deref(), Some("hello there"));
            }
            other => panic!("expected bot_response, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_echoes() {
        let replies = Responder::new().respond("");
        match &replies[0] {
            ServerMessage::BotResponse { message, .. } => assert_eq!(message, "Echo: "),
            other => panic!("expected bot_response, got {other:?}"),
        }
    }
}

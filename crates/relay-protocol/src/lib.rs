//! Wire protocol for the Lancer chat relay.
//!
//! Every frame on the wire is a JSON object. Clients send loosely shaped
//! chat payloads (or a `sync_history` request); the relay answers with one
//! of the tagged [`ServerMessage`] variants.
//!
//! # Example
//!
//! ```rust
//! use relay_protocol::{ClientMessage, ServerMessage};
//!
//! let inbound = ClientMessage::parse(r#"{"message": "open github"}"#).unwrap();
//! assert!(!inbound.is_history_sync());
//!
//! let reply = ServerMessage::chat_answer("On it!");
//! let frame = serde_json::to_string(&reply).unwrap();
//! assert!(frame.contains(r#""type":"chat_answer""#));
//! ```

pub mod client;
pub mod sender;
pub mod server;

pub use client::{ClientMessage, SYNC_HISTORY};
pub use sender::Sender;
pub use server::{now_millis, HistoryEntry, ServerMessage};

//! Keyword classification and canned responses for the Lancer chat relay.
//!
//! Chat text is matched against an ordered rule table ([`classify`]); the
//! [`Responder`] turns the winning category into one or two outbound
//! messages. Neither half touches a socket, so response behavior is testable
//! in isolation.
//!
//! # Example
//!
//! ```rust
//! use relay_responder::{classify, Category, Responder};
//!
//! assert_eq!(classify("open github"), Category::Navigation);
//!
//! let responder = Responder::new();
//! let replies = responder.respond("open github");
//! assert_eq!(replies.len(), 2); // open_tab + chat_answer follow-up
//! ```

pub mod classify;
pub mod navigation;
pub mod responder;

pub use classify::{classify, Category};
pub use navigation::find_url;
pub use responder::Responder;

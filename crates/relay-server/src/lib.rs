//! WebSocket chat relay server for Lancer.
//!
//! The relay accepts one WebSocket connection per client, greets it, and
//! then classifies every chat frame by keyword to produce canned replies,
//! open-tab requests, or echoes. Every conversational event is appended to
//! a JSON-lines log, and a client can ask for the recent history recorded
//! under its address with a `sync_history` frame.
//!
//! Modules:
//! - [`relay`]: session table, deduplication, message handling, shutdown
//! - [`session`]: per-connection WebSocket loop and heartbeats
//! - [`sink`]: outbound send seam (live socket or test double)
//! - [`dedupe`]: bounded fingerprint set for retried client sends
//! - [`routes`]: WebSocket endpoint plus `/health`
//! - [`config`]: environment-driven configuration

pub mod config;
pub mod dedupe;
pub mod relay;
pub mod routes;
pub mod session;
pub mod sink;

pub use config::{Config, ConfigError};
pub use relay::{ChatRelay, RelayOptions};
pub use sink::{MessageSink, SharedSink, SinkError};

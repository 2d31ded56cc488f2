//! Outbound message sinks.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;
use thiserror::Error;
use tokio::sync::Mutex;

use relay_protocol::ServerMessage;

/// Errors on the outbound path of a session.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Message could not be encoded as JSON.
    #[error("message encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The transport rejected the send, usually a closed connection.
    #[error("websocket send failed: {0}")]
    Transport(String),
}

/// Write half of a session's connection.
///
/// The relay only talks to sessions through this trait, so tests can
/// substitute recording or failing doubles for a live socket.
#[async_trait]
pub trait MessageSink: Send {
    /// Deliver one message to the client.
    async fn send(&mut self, message: &ServerMessage) -> Result<(), SinkError>;

    /// Send a transport-level keepalive ping. Doubles ignore this.
    async fn ping(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink shared between a session's connection task and the relay.
pub type SharedSink = Arc<Mutex<Box<dyn MessageSink>>>;

/// Wrap a boxed sink for storage in the session table.
pub fn shared(sink: Box<dyn MessageSink>) -> SharedSink {
    Arc::new(Mutex::new(sink))
}

/// Live WebSocket sink.
pub struct WsSink {
    sink: SplitSink<WebSocket, Message>,
}

impl WsSink {
    /// Wrap the write half of an upgraded socket.
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl MessageSink for WsSink {
    async fn send(&mut self, message: &ServerMessage) -> Result<(), SinkError> {
        let text = serde_json::to_string(message)?;
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }

    async fn ping(&mut self) -> Result<(), SinkError> {
        self.sink
            .send(Message::Ping(Vec::new()))
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }
}

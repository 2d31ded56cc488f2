//! The chat relay: session table, message handling, shutdown broadcast.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use conversation_log::{ConversationLog, ConversationRecord};
use relay_protocol::{now_millis, ClientMessage, Sender, ServerMessage};
use relay_responder::Responder;

use crate::dedupe::{fingerprint, RecentMessages};
use crate::sink::SharedSink;

/// Reply to a frame that does not parse as JSON.
const PARSE_ERROR_TEXT: &str = "Sorry, I couldn't understand that message format.";

/// Broadcast to every session during shutdown.
const SHUTDOWN_TEXT: &str = "Server is shutting down. Goodbye!";

/// Behavior knobs for a relay instance.
#[derive(Debug, Clone)]
pub struct RelayOptions {
    /// Most recent conversational rows replayed per history request.
    pub history_limit: usize,
    /// Simulated processing delay before chat replies, in milliseconds
    /// (inclusive range). `None` replies immediately; tests use that.
    pub response_delay_ms: Option<(u64, u64)>,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            history_limit: 50,
            response_delay_ms: Some((500, 1500)),
        }
    }
}

/// One registered session.
struct Session {
    /// Originating client address.
    addr: String,
    /// When the session connected.
    connected_at: Instant,
    /// Write half of the connection.
    sink: SharedSink,
}

/// Mutable relay state, behind one lock.
#[derive(Default)]
struct RelayInner {
    sessions: HashMap<String, Session>,
    recent: RecentMessages,
}

/// The chat relay.
///
/// One instance per process, shared into connection tasks as
/// `Arc<ChatRelay>`. The lock over the session table and dedup set is held
/// only for table lookups and fingerprint inserts, never across a response
/// delay, a log append, or an outbound send.
pub struct ChatRelay {
    log: ConversationLog,
    responder: Responder,
    options: RelayOptions,
    inner: Mutex<RelayInner>,
}

impl ChatRelay {
    /// Create a relay over the given log and responder.
    pub fn new(log: ConversationLog, responder: Responder, options: RelayOptions) -> Self {
        Self {
            log,
            responder,
            options,
            inner: Mutex::new(RelayInner::default()),
        }
    }

    /// Register a new session: assign an id, log the connection, and greet
    /// the client. Returns the session id.
    pub async fn connect(&self, addr: impl Into<String>, sink: SharedSink) -> String {
        let addr = addr.into();

        let session_id = {
            let mut inner = self.inner.lock().await;
            if inner.sessions.values().any(|s| s.addr == addr) {
                warn!(addr = %addr, "Multiple connections from the same address");
            }
            let session_id = unused_session_id(&inner.sessions, new_session_id);
            inner.sessions.insert(
                session_id.clone(),
                Session {
                    addr: addr.clone(),
                    connected_at: Instant::now(),
                    sink: Arc::clone(&sink),
                },
            );
            session_id
        };

        info!(client_id = %session_id, addr = %addr, "Client connected");
        self.record(
            Sender::System,
            format!("Client connected from {addr}"),
            &session_id,
            &addr,
        )
        .await;

        let greeting = ServerMessage::bot_response(
            format!(
                "Hello! I'm Lancer, your freelance assistant (ID: {session_id}). I can chat \
                 with you and help you open relevant tabs."
            ),
            None,
        );
        if let Err(e) = sink.lock().await.send(&greeting).await {
            warn!(client_id = %session_id, error = %e, "Failed to send greeting");
        }

        session_id
    }

    /// Remove a session and log the disconnect. A second call for an
    /// already-removed id is a no-op.
    pub async fn disconnect(&self, session_id: &str) {
        let removed = self.inner.lock().await.sessions.remove(session_id);
        if let Some(session) = removed {
            info!(
                client_id = %session_id,
                addr = %session.addr,
                connected_for = ?session.connected_at.elapsed(),
                "Client disconnected"
            );
            self.record(
                Sender::System,
                format!("Client disconnected from {}", session.addr),
                session_id,
                &session.addr,
            )
            .await;
        }
    }

    /// Handle one inbound text frame from a session.
    ///
    /// All failure paths end here: a malformed frame earns a single error
    /// reply, duplicates are dropped silently, and log or send failures are
    /// downgraded to warnings.
    pub async fn handle_text(&self, session_id: &str, raw: &str) {
        let (addr, sink) = {
            let inner = self.inner.lock().await;
            match inner.sessions.get(session_id) {
                Some(session) => (session.addr.clone(), Arc::clone(&session.sink)),
                None => {
                    warn!(client_id = %session_id, "Message from unregistered session");
                    return;
                }
            }
        };

        let message = match ClientMessage::parse(raw) {
            Ok(message) => message,
            Err(e) => {
                debug!(client_id = %session_id, error = %e, "Malformed frame");
                let reply = ServerMessage::system_message(PARSE_ERROR_TEXT);
                if let Err(e) = sink.lock().await.send(&reply).await {
                    warn!(client_id = %session_id, error = %e, "Failed to send error reply");
                }
                return;
            }
        };

        if message.is_history_sync() {
            self.send_history(session_id, &addr, &sink).await;
        } else {
            self.handle_chat(session_id, &addr, &sink, message).await;
        }
    }

    /// Broadcast the shutdown notice, log each delivered copy, then drop
    /// every session. A failed send skips that client only.
    pub async fn shutdown(&self) {
        let sessions: Vec<(String, String, SharedSink)> = {
            let inner = self.inner.lock().await;
            inner
                .sessions
                .iter()
                .map(|(id, s)| (id.clone(), s.addr.clone(), Arc::clone(&s.sink)))
                .collect()
        };

        info!(sessions = sessions.len(), "Broadcasting shutdown notice");
        let notice = ServerMessage::system_message(SHUTDOWN_TEXT);
        for (session_id, addr, sink) in sessions {
            match sink.lock().await.send(&notice).await {
                Ok(()) => {
                    self.record(Sender::System, SHUTDOWN_TEXT, &session_id, &addr)
                        .await;
                }
                Err(e) => {
                    warn!(client_id = %session_id, error = %e, "Shutdown notice not delivered");
                }
            }
        }

        self.inner.lock().await.sessions.clear();
    }

    /// Number of currently registered sessions.
    pub async fn session_count(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    async fn handle_chat(
        &self,
        session_id: &str,
        addr: &str,
        sink: &SharedSink,
        message: ClientMessage,
    ) {
        let text = message.message;
        let declared = message.timestamp.unwrap_or_else(now_millis);

        let fresh = {
            let mut inner = self.inner.lock().await;
            inner.recent.insert(fingerprint(session_id, &text, declared))
        };
        if !fresh {
            debug!(client_id = %session_id, "Duplicate message ignored");
            return;
        }

        self.record(Sender::User, text.clone(), session_id, addr).await;

        if let Some((lo, hi)) = self.options.response_delay_ms {
            let delay = rand::thread_rng().gen_range(lo..=hi);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        for reply in self.responder.respond(&text) {
            if let Err(e) = sink.lock().await.send(&reply).await {
                warn!(client_id = %session_id, error = %e, "Failed to send reply");
                return;
            }
            if let Some((sender, logged)) = log_entry(&reply) {
                self.record(sender, logged, session_id, addr).await;
            }
        }
    }

    async fn send_history(&self, session_id: &str, addr: &str, sink: &SharedSink) {
        let records = match self
            .log
            .recent_for_addr(addr, self.options.history_limit)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!(addr = %addr, error = %e, "Failed to read history");
                Vec::new()
            }
        };

        let entries: Vec<_> = records
            .iter()
            .map(ConversationRecord::to_history_entry)
            .collect();
        info!(client_id = %session_id, addr = %addr, rows = entries.len(), "Replaying history");

        let reply = ServerMessage::conversation_history(entries);
        if let Err(e) = sink.lock().await.send(&reply).await {
            warn!(client_id = %session_id, error = %e, "Failed to send history");
        }
    }

    /// Append a record, downgrading failures to a warning.
    async fn record(
        &self,
        sender: Sender,
        message: impl Into<String>,
        session_id: &str,
        addr: &str,
    ) {
        let record = ConversationRecord::now(sender, message, session_id, addr);
        if let Err(e) = self.log.append(&record).await {
            warn!(client_id = %session_id, sender = %sender, error = %e, "Failed to append conversation record");
        }
    }
}

/// Map an outbound message to its log row, if it gets one.
///
/// Tab opens are recorded as the relay acting (`system`), conversational
/// replies as `bot`; history replay is read-only and never logged.
fn log_entry(message: &ServerMessage) -> Option<(Sender, String)> {
    match message {
        ServerMessage::BotResponse { message, .. } => Some((Sender::Bot, message.clone())),
        ServerMessage::ChatAnswer { message, .. } => Some((Sender::Bot, message.clone())),
        ServerMessage::OpenTab { url, .. } => Some((Sender::System, format!("Opened {url}"))),
        ServerMessage::SystemMessage { message, .. } => Some((Sender::System, message.clone())),
        ServerMessage::ConversationHistory { .. } => None,
    }
}

/// Short random session id (first 8 hex characters of a v4 UUID).
fn new_session_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Draw candidate ids until one is not in the session table, keeping ids
/// unique among currently open sessions.
fn unused_session_id(
    sessions: &HashMap<String, Session>,
    mut candidate: impl FnMut() -> String,
) -> String {
    let mut id = candidate();
    while sessions.contains_key(&id) {
        id = candidate();
    }
    id
}

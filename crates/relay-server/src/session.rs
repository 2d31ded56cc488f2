//! Per-connection WebSocket plumbing.
//!
//! The transport contract pings every 30 s and drops a session once 40 s
//! pass without any inbound frame. Tests shorten both intervals to keep
//! feedback fast.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::StreamExt;
use tokio::time::interval_at;
use tracing::{debug, warn};

use crate::relay::ChatRelay;
use crate::sink::{shared, WsSink};

/// Transport keepalive ping cadence (30 s in production, shorter in tests).
#[cfg(not(test))]
const PING_INTERVAL: Duration = Duration::from_secs(30);
#[cfg(test)]
const PING_INTERVAL: Duration = Duration::from_millis(100);

/// Max age of the last inbound frame before the session is dropped.
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(200);

/// Upgrade an HTTP request into a relay session.
pub async fn ws_handler(
    State(relay): State<Arc<ChatRelay>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_session(relay, peer, socket))
}

/// Drive one session: register it, pump frames through the relay, and tear
/// it down on close, transport error, or heartbeat timeout.
///
/// Frames are handled to completion before the next one is read, so a
/// session's replies always come back in receipt order.
async fn run_session(relay: Arc<ChatRelay>, peer: SocketAddr, socket: WebSocket) {
    let (write, mut read) = socket.split();
    let sink = shared(Box::new(WsSink::new(write)));

    let session_id = relay.connect(peer.ip().to_string(), Arc::clone(&sink)).await;
    // First tick one full interval after connect, not at connect time.
    let mut heartbeat = interval_at(tokio::time::Instant::now() + PING_INTERVAL, PING_INTERVAL);
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    last_seen = Instant::now();
                    relay.handle_text(&session_id, &text).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => last_seen = Instant::now(),
                Some(Err(e)) => {
                    warn!(client_id = %session_id, error = %e, "WebSocket receive error");
                    break;
                }
            },
            _ = heartbeat.tick() => {
                if last_seen.elapsed() > CLIENT_TIMEOUT {
                    debug!(client_id = %session_id, "Heartbeat timeout");
                    break;
                }
                if sink.lock().await.ping().await.is_err() {
                    break;
                }
            }
        }
    }

    relay.disconnect(&session_id).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::RelayOptions;
    use crate::routes;
    use conversation_log::{ConversationLog, ConversationRecord};
    use futures::SinkExt;
    use relay_responder::Responder;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;
    use tokio::net::TcpStream;
    use tokio_tungstenite::tungstenite::Message as ClientFrame;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    type ClientSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

    fn log_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("conversations.jsonl")
    }

    async fn start_server(dir: &tempfile::TempDir) -> (Arc<ChatRelay>, SocketAddr) {
        let options = RelayOptions {
            history_limit: 50,
            response_delay_ms: None,
        };
        let relay = Arc::new(ChatRelay::new(
            ConversationLog::new(log_path(dir)),
            Responder::new(),
            options,
        ));
        let app = routes::router().with_state(Arc::clone(&relay));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });
        (relay, addr)
    }

    async fn connect(addr: SocketAddr) -> ClientSocket {
        let (socket, _response) = connect_async(format!("ws://{addr}/")).await.unwrap();
        socket
    }

    /// Next text frame, skipping keepalive traffic.
    async fn next_text(socket: &mut ClientSocket) -> String {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
                .await
                .expect("timed out waiting for a frame");
            match frame {
                Some(Ok(ClientFrame::Text(text))) => return text,
                Some(Ok(ClientFrame::Ping(_))) | Some(Ok(ClientFrame::Pong(_))) => continue,
                other => panic!("expected text frame, got {other:?}"),
            }
        }
    }

    async fn wait_for_teardown(relay: &ChatRelay) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while relay.session_count().await > 0 {
            assert!(Instant::now() < deadline, "session still registered");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn read_records(path: &Path) -> Vec<ConversationRecord> {
        let contents = std::fs::read_to_string(path).unwrap_or_default();
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_ws_greeting_and_chat_round_trip() {
        let dir = tempdir().unwrap();
        let (relay, addr) = start_server(&dir).await;
        let mut socket = connect(addr).await;

        let greeting = next_text(&mut socket).await;
        assert!(greeting.contains("Hello! I'm Lancer"));
        assert!(greeting.contains(r#""type":"bot_response""#));
        assert_eq!(relay.session_count().await, 1);

        socket
            .send(ClientFrame::Text(
                r#"{"message": "open github"}"#.to_string(),
            ))
            .await
            .unwrap();

        let tab = next_text(&mut socket).await;
        assert!(tab.contains(r#""type":"open_tab""#));
        assert!(tab.contains("https://github.com"));
        let followup = next_text(&mut socket).await;
        assert!(followup.contains(r#""type":"chat_answer""#));

        drop(socket);
        wait_for_teardown(&relay).await;
        let records = read_records(&log_path(&dir));
        assert!(records
            .iter()
            .any(|r| r.message.contains("Client disconnected")));
    }

    #[tokio::test]
    async fn test_idle_session_dropped_after_timeout() {
        let dir = tempdir().unwrap();
        let (relay, addr) = start_server(&dir).await;
        let mut socket = connect(addr).await;

        let greeting = next_text(&mut socket).await;
        assert!(greeting.contains("Hello! I'm Lancer"));
        assert_eq!(relay.session_count().await, 1);

        // Stop polling the socket: pings go unanswered, so the heartbeat
        // timeout trips without any client traffic.
        tokio::time::sleep(CLIENT_TIMEOUT + PING_INTERVAL * 3).await;
        wait_for_teardown(&relay).await;

        let records = read_records(&log_path(&dir));
        assert!(records
            .iter()
            .any(|r| r.message.contains("Client disconnected")));

        // The server closed the transport; the client stream terminates.
        let ended = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                match socket.next().await {
                    Some(Ok(ClientFrame::Ping(_))) | Some(Ok(ClientFrame::Pong(_))) => continue,
                    Some(Ok(ClientFrame::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(other)) => panic!("unexpected frame before close: {other:?}"),
                }
            }
        })
        .await;
        assert!(ended.is_ok());
    }

    #[tokio::test]
    async fn test_first_ping_waits_full_interval() {
        let dir = tempdir().unwrap();
        let (_relay, addr) = start_server(&dir).await;
        let mut socket = connect(addr).await;

        let greeting = next_text(&mut socket).await;
        assert!(greeting.contains("Hello! I'm Lancer"));

        // Quiet until one full interval has elapsed.
        let early = tokio::time::timeout(PING_INTERVAL / 2, socket.next()).await;
        assert!(early.is_err(), "keepalive fired before the first interval");

        let frame = tokio::time::timeout(PING_INTERVAL * 4, socket.next())
            .await
            .expect("no keepalive ping after the first interval");
        assert!(matches!(frame, Some(Ok(ClientFrame::Ping(_)))));
    }
}

//! WebSocket chat relay server for Lancer.
//!
//! Accepts browser connections, classifies chat messages, keeps an
//! append-only conversation log, and replays history to reconnecting
//! clients.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use conversation_log::ConversationLog;
use relay_responder::Responder;
use relay_server::{routes, ChatRelay, Config, RelayOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    info!(addr = %config.addr, log = %config.log_path.display(), "Starting chat relay");

    let log = ConversationLog::new(&config.log_path);
    let responder = Responder::new().with_offer_count(config.offer_count);
    let options = RelayOptions {
        history_limit: config.history_limit,
        ..RelayOptions::default()
    };
    let relay = Arc::new(ChatRelay::new(log, responder, options));

    let app = routes::router().with_state(Arc::clone(&relay));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "Chat relay listening");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );

    tokio::select! {
        biased;

        () = shutdown_signal() => {
            info!("Shutdown signal received, notifying clients");
            relay.shutdown().await;
        }
        result = async { server.await } => {
            result?;
        }
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Relay server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// Conversation log file path.
    pub log_path: PathBuf,
    /// Most recent rows replayed per history request.
    pub history_limit: usize,
    /// Offer count reported by offer inquiries.
    pub offer_count: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `RELAY_ADDR` | Server bind address | `127.0.0.1:8080` |
    /// | `RELAY_LOG_PATH` | Conversation log file | `conversations.jsonl` |
    /// | `RELAY_HISTORY_LIMIT` | History replay row limit | `50` |
    /// | `RELAY_OFFER_COUNT` | Offers reported as loaded | `0` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("RELAY_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let log_path = env::var("RELAY_LOG_PATH")
            .unwrap_or_else(|_| "conversations.jsonl".to_string())
            .into();

        let history_limit = parse_count("RELAY_HISTORY_LIMIT", 50)?;
        let offer_count = parse_count("RELAY_OFFER_COUNT", 0)?;

        Ok(Self {
            addr,
            log_path,
            history_limit,
            offer_count,
        })
    }
}

fn parse_count(var: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(var) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidCount(var)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid RELAY_ADDR format")]
    InvalidAddr,

    #[error("Invalid numeric value for {0}")]
    InvalidCount(&'static str),
}

//! Conversation log error types.

use thiserror::Error;

/// Errors that can occur while appending to or reading the log file.
#[derive(Debug, Error)]
pub enum LogError {
    /// Filesystem error (open, write, flush, read).
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record encoding error.
    #[error("log encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for log operations.
pub type Result<T> = std::result::Result<T, LogError>;

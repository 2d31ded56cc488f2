//! Append-only JSON-lines conversation log for the Lancer chat relay.
//!
//! Every logged event is one self-contained JSON object per line. Appends
//! open the file in append mode, write the line, and flush before
//! returning; reads skip unparseable lines (e.g. a torn final line after a
//! crash) with a warning. Durability is best-effort: the relay keeps
//! serving when an append fails.
//!
//! # Example
//!
//! ```no_run
//! use conversation_log::{ConversationLog, ConversationRecord};
//! use relay_protocol::Sender;
//!
//! #[tokio::main]
//! async fn main() -> conversation_log::Result<()> {
//!     let log = ConversationLog::new("conversations.jsonl");
//!
//!     let record = ConversationRecord::now(Sender::User, "hello", "ab12cd34", "10.0.0.1");
//!     log.append(&record).await?;
//!
//!     let history = log.recent_for_addr("10.0.0.1", 50).await?;
//!     println!("{} rows", history.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod record;

pub use error::{LogError, Result};
pub use record::ConversationRecord;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Handle to an append-only conversation log file.
///
/// Cheap to clone; each append opens the file rather than holding it open,
/// so a handle carries no state beyond the path.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    path: PathBuf,
}

impl ConversationLog {
    /// Create a handle for the given file path.
    ///
    /// The file itself is created on first append, not here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line and flush it.
    pub async fn append(&self, record: &ConversationRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// The most recent `limit` conversational rows (`user`/`bot` only)
    /// logged under `client_ip`, oldest first.
    ///
    /// A missing file is an empty history, not an error.
    pub async fn recent_for_addr(
        &self,
        client_ip: &str,
        limit: usize,
    ) -> Result<Vec<ConversationRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ConversationRecord>(line) {
                Ok(record) => {
                    if record.client_ip == client_ip && record.sender.is_conversational() {
                        records.push(record);
                    }
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Skipping unparseable log line");
                }
            }
        }

        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
        Ok(records)
    }
}

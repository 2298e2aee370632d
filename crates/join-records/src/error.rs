//! Record store error types.

use thiserror::Error;

/// Errors that can occur while persisting join records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Reading or writing the records file failed.
    #[error("record file error: {0}")]
    Io(#[from] std::io::Error),

    /// The records document could not be encoded or decoded.
    #[error("record json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The blocking write task did not finish.
    #[error("record write task failed: {0}")]
    Task(String),
}

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, RecordError>;

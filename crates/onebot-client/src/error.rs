//! Error types for onebot-client.

use join_core::GatewayError;
use thiserror::Error;

/// Errors that can occur when talking to a OneBot implementation.
#[derive(Debug, Error)]
pub enum OneBotError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The action returned a failure status.
    #[error("action {action} failed (retcode {retcode}): {message}")]
    Action {
        action: String,
        retcode: i64,
        message: String,
    },

    /// The API answered with a non-success HTTP status.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Health check failed.
    #[error("Health check failed")]
    HealthCheckFailed,

    /// An event post could not be understood.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

impl From<OneBotError> for GatewayError {
    fn from(err: OneBotError) -> Self {
        match err {
            OneBotError::Action {
                action,
                retcode,
                message,
            } => GatewayError::Action {
                action,
                retcode,
                message,
            },
            other => GatewayError::Transport(other.to_string()),
        }
    }
}

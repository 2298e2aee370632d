//! Listener error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use join_manager::JoinManagerError;
use onebot_client::OneBotError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors that can occur in the listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Missing or wrong bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// Event post without a valid `X-Signature`.
    #[error("invalid event signature")]
    InvalidSignature,

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The dispatch worker is gone.
    #[error("event queue closed")]
    QueueClosed,

    /// Invalid process configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Manager configuration or persistence failed.
    #[error(transparent)]
    Manager(#[from] JoinManagerError),

    /// The OneBot API could not be reached.
    #[error("onebot error: {0}")]
    OneBot(#[from] OneBotError),

    /// Binding or serving failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ListenerError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            ListenerError::Unauthorized => {
                warn!("Unauthorized request");
                (StatusCode::UNAUTHORIZED, "auth_error")
            }
            ListenerError::InvalidSignature => {
                warn!("Rejected event post with a bad signature");
                (StatusCode::UNAUTHORIZED, "signature_error")
            }
            ListenerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ListenerError::QueueClosed => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            other => {
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "type": kind
            }
        });
        (status, Json(body)).into_response()
    }
}

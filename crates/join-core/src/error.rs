//! Error types for platform boundary calls.

use thiserror::Error;

/// Errors returned by [`PlatformGateway`](crate::PlatformGateway) and
/// [`MessageSender`](crate::MessageSender) implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The platform answered the action with a failure status.
    #[error("action {action} failed (retcode {retcode}): {message}")]
    Action {
        action: String,
        retcode: i64,
        message: String,
    },

    /// The request never reached the platform or the reply was unreadable.
    #[error("transport error: {0}")]
    Transport(String),

    /// A session identifier could not be mapped to a destination.
    #[error("invalid session id: {0}")]
    InvalidSession(String),

    /// The binding does not support the requested operation.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

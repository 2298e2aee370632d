//! Error types for manager operations.

use join_records::RecordError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors from the manager's maintenance operations.
///
/// Event handling itself never fails; see [`crate::HandleOutcome`].
#[derive(Debug, Error)]
pub enum JoinManagerError {
    /// Loading the configuration failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Persisting the record store failed.
    #[error("record store error: {0}")]
    Records(#[from] RecordError),
}

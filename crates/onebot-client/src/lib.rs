//! OneBot v11 client library.
//!
//! This crate provides a Rust client for the HTTP action API of a OneBot v11
//! implementation (go-cqhttp, NapCat, Lagrange, ...). It supports:
//!
//! - Approving and rejecting group join requests
//! - Sending group and private messages with text, mentions and images
//! - Looking up user profiles
//! - Parsing event posts delivered over reverse HTTP
//!
//! # Example
//!
//! ```no_run
//! use onebot_client::{OneBotClient, OneBotConfig, Segment};
//!
//! # async fn example() -> Result<(), onebot_client::OneBotError> {
//! // Connect to the API
//! let config = OneBotConfig::default();
//! let client = OneBotClient::connect(config).await?;
//!
//! // Approve a pending request
//! client.set_group_add_request("flag-from-event", true, None).await?;
//!
//! // Send a message
//! let message = vec![Segment::Text { text: "Hello!".to_string() }];
//! client.send_group_msg("123456", message).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::OneBotClient;
pub use config::OneBotConfig;
pub use error::OneBotError;
pub use gateway::OneBotGateway;
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

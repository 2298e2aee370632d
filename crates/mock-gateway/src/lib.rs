//! Test doubles for the join-request manager seams.
//!
//! This crate provides implementations of the `join-core` traits that record
//! their calls instead of talking to a chat platform:
//! - `RecordingGateway` - Platform actions and message delivery
//! - `RecordingSleeper` - Pacing without wall-clock waits
//! - `StaticRenderer` - Placeholder chart files, or failures on demand
//!
//! For a real platform binding, use the `onebot-client` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_gateway::{PlatformGateway, RecordingGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_gateway::GatewayError> {
//!     let gateway = RecordingGateway::new();
//!
//!     gateway.set_group_add_request("flag-1", true, None).await?;
//!
//!     assert!(gateway.actions()[0].approve);
//!     Ok(())
//! }
//! ```

mod gateway;
mod renderer;
mod sleeper;

// Re-export join-core types for convenience
pub use join_core::{
    async_trait, GatewayError, MessageChain, MessageSender, PlatformGateway, ReportRenderer,
    SessionId, Sleeper,
};

pub use gateway::{ActionCall, RecordingGateway, SentMessage};
pub use renderer::StaticRenderer;
pub use sleeper::RecordingSleeper;

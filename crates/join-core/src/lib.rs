//! Core traits and types for the group join-request manager.
//!
//! This crate provides the shared interface between the decision logic in
//! `join-manager` and the platform bindings (e.g. `onebot-client`). It defines:
//!
//! - [`InboundEvent`] / [`JoinRequest`] - Strongly typed inbound events
//! - [`SessionId`] / [`MessageChain`] - Outbound addressing and message segments
//! - [`PlatformGateway`] - Approve/reject actions on the chat platform
//! - [`MessageSender`] - Delivery of notices to sessions
//! - [`Sleeper`] - Pacing seam for delayed sends
//! - [`ReportRenderer`] - External chart renderer collaborator
//!
//! # Example
//!
//! ```rust
//! use join_core::{async_trait, GatewayError, MessageChain, MessageSender, SessionId};
//!
//! struct StdoutSender;
//!
//! #[async_trait]
//! impl MessageSender for StdoutSender {
//!     async fn send_message(
//!         &self,
//!         session: &SessionId,
//!         chain: &MessageChain,
//!     ) -> Result<(), GatewayError> {
//!         println!("{} <- {}", session, chain.plain_text());
//!         Ok(())
//!     }
//! }
//! ```

mod error;
mod event;
mod gateway;
pub mod ids;
mod message;
mod render;
mod session;

pub use error::GatewayError;
pub use event::{InboundEvent, JoinRequest};
pub use gateway::{MessageSender, PlatformGateway, Sleeper, TokioSleeper};
pub use message::{MessageChain, MessageSegment};
pub use render::{CategoryCount, ChartSummary, RenderError, RenderedChart, ReportRenderer};
pub use session::{SessionId, SessionKind, SessionTarget};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

/// Platform name used by OneBot v11 (`aiocqhttp`) bindings.
pub const ONEBOT_PLATFORM: &str = "aiocqhttp";

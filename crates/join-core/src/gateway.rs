//! Seam traits for platform actions, message delivery and pacing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::message::MessageChain;
use crate::session::SessionId;

/// Actions on join requests exposed by a chat platform.
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Name of the platform this binding talks to (e.g. `aiocqhttp`).
    ///
    /// Requests delivered from a different platform are left untouched.
    fn platform(&self) -> &str;

    /// Approve or reject a pending group add request.
    ///
    /// # Arguments
    /// * `flag` - Opaque token taken verbatim from the request event
    /// * `approve` - true to approve, false to reject
    /// * `reason` - Rejection reason shown to the requester
    async fn set_group_add_request(
        &self,
        flag: &str,
        approve: bool,
        reason: Option<&str>,
    ) -> Result<(), GatewayError>;

    /// Look up a user's display name.
    ///
    /// Default implementation knows no names.
    async fn user_display_name(&self, user_id: &str) -> Result<Option<String>, GatewayError> {
        let _ = user_id;
        Ok(None)
    }
}

/// Delivery of messages to sessions.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a message chain to a session.
    async fn send_message(
        &self,
        session: &SessionId,
        chain: &MessageChain,
    ) -> Result<(), GatewayError>;
}

/// Suspends the caller; swapped out in tests to avoid wall-clock waits.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[async_trait]
impl<T: PlatformGateway + ?Sized> PlatformGateway for Arc<T> {
    fn platform(&self) -> &str {
        (**self).platform()
    }

    async fn set_group_add_request(
        &self,
        flag: &str,
        approve: bool,
        reason: Option<&str>,
    ) -> Result<(), GatewayError> {
        (**self).set_group_add_request(flag, approve, reason).await
    }

    async fn user_display_name(&self, user_id: &str) -> Result<Option<String>, GatewayError> {
        (**self).user_display_name(user_id).await
    }
}

#[async_trait]
impl<T: MessageSender + ?Sized> MessageSender for Arc<T> {
    async fn send_message(
        &self,
        session: &SessionId,
        chain: &MessageChain,
    ) -> Result<(), GatewayError> {
        (**self).send_message(session, chain).await
    }
}

#[async_trait]
impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

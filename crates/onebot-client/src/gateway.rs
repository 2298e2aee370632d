//! Binding of the OneBot client to the manager's seams.

use async_trait::async_trait;
use join_core::{
    GatewayError, MessageChain, MessageSender, PlatformGateway, SessionId, SessionKind,
    ONEBOT_PLATFORM,
};
use tracing::debug;

use crate::client::OneBotClient;
use crate::types::Segment;

/// [`PlatformGateway`] and [`MessageSender`] over a [`OneBotClient`].
#[derive(Debug, Clone)]
pub struct OneBotGateway {
    client: OneBotClient,
    platform: String,
}

impl OneBotGateway {
    /// Bind a client under the `aiocqhttp` platform name.
    pub fn new(client: OneBotClient) -> Self {
        Self::with_platform(client, ONEBOT_PLATFORM)
    }

    /// Bind a client under another platform name.
    pub fn with_platform(client: OneBotClient, platform: impl Into<String>) -> Self {
        Self {
            client,
            platform: platform.into(),
        }
    }

    pub fn client(&self) -> &OneBotClient {
        &self.client
    }
}

#[async_trait]
impl PlatformGateway for OneBotGateway {
    fn platform(&self) -> &str {
        &self.platform
    }

    async fn set_group_add_request(
        &self,
        flag: &str,
        approve: bool,
        reason: Option<&str>,
    ) -> Result<(), GatewayError> {
        Ok(self.client.set_group_add_request(flag, approve, reason).await?)
    }

    async fn user_display_name(&self, user_id: &str) -> Result<Option<String>, GatewayError> {
        let info = self.client.get_stranger_info(user_id).await?;
        Ok(Some(info.nickname).filter(|n| !n.is_empty()))
    }
}

#[async_trait]
impl MessageSender for OneBotGateway {
    async fn send_message(
        &self,
        session: &SessionId,
        chain: &MessageChain,
    ) -> Result<(), GatewayError> {
        let target = session.target()?;
        if target.platform != self.platform {
            return Err(GatewayError::Unsupported(format!(
                "session {} is not on platform {}",
                session, self.platform
            )));
        }

        let message = Segment::from_chain(chain);
        let message_id = match target.kind {
            SessionKind::Group => self.client.send_group_msg(target.id, message).await?,
            SessionKind::Private => self.client.send_private_msg(target.id, message).await?,
        };
        debug!("Sent message {:?} to {}", message_id, session);
        Ok(())
    }
}

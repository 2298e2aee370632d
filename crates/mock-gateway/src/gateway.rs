//! Recording gateway - captures platform actions and sent messages.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use join_core::{
    GatewayError, MessageChain, MessageSender, PlatformGateway, SessionId, ONEBOT_PLATFORM,
};

/// One call to `set_group_add_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    pub flag: String,
    pub approve: bool,
    pub reason: Option<String>,
}

/// One delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub session: SessionId,
    pub chain: MessageChain,
}

#[derive(Debug, Default)]
struct State {
    actions: Vec<ActionCall>,
    sent: Vec<SentMessage>,
    fail_actions: bool,
    fail_sends_to: HashSet<String>,
    names: HashMap<String, String>,
    name_lookups: Vec<String>,
    fail_name_lookup: bool,
}

/// A gateway that records everything and never touches a network.
///
/// Implements both [`PlatformGateway`] and [`MessageSender`], so one
/// instance (usually behind an `Arc`) can serve both seams of a manager.
#[derive(Debug)]
pub struct RecordingGateway {
    platform: String,
    state: Mutex<State>,
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingGateway {
    /// Create a gateway bound to the OneBot platform name.
    pub fn new() -> Self {
        Self::with_platform(ONEBOT_PLATFORM)
    }

    /// Create a gateway bound to another platform name.
    pub fn with_platform(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the recorded calls.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every approve/reject call fail.
    pub fn fail_actions(&self) {
        self.state().fail_actions = true;
    }

    /// Make sends to `session` fail.
    pub fn fail_sends_to(&self, session: impl Into<String>) {
        self.state().fail_sends_to.insert(session.into());
    }

    /// Register a display name returned by `user_display_name`.
    pub fn set_display_name(&self, user_id: impl Into<String>, name: impl Into<String>) {
        self.state().names.insert(user_id.into(), name.into());
    }

    /// Make display name lookups fail.
    pub fn fail_name_lookup(&self) {
        self.state().fail_name_lookup = true;
    }

    /// User ids passed to `user_display_name`, in order.
    pub fn name_lookups(&self) -> Vec<String> {
        self.state().name_lookups.clone()
    }

    /// Approve/reject calls, in order.
    pub fn actions(&self) -> Vec<ActionCall> {
        self.state().actions.clone()
    }

    /// Successfully sent messages, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.state().sent.clone()
    }
}

#[async_trait]
impl PlatformGateway for RecordingGateway {
    fn platform(&self) -> &str {
        &self.platform
    }

    async fn set_group_add_request(
        &self,
        flag: &str,
        approve: bool,
        reason: Option<&str>,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.actions.push(ActionCall {
            flag: flag.to_string(),
            approve,
            reason: reason.map(str::to_string),
        });

        if state.fail_actions {
            return Err(GatewayError::Action {
                action: "set_group_add_request".to_string(),
                retcode: 100,
                message: "mock failure".to_string(),
            });
        }
        Ok(())
    }

    async fn user_display_name(&self, user_id: &str) -> Result<Option<String>, GatewayError> {
        let mut state = self.state();
        state.name_lookups.push(user_id.to_string());
        if state.fail_name_lookup {
            return Err(GatewayError::Transport("mock lookup failure".to_string()));
        }
        Ok(state.names.get(user_id).cloned())
    }
}

#[async_trait]
impl MessageSender for RecordingGateway {
    async fn send_message(
        &self,
        session: &SessionId,
        chain: &MessageChain,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        if state.fail_sends_to.contains(session.as_str()) {
            return Err(GatewayError::Transport(format!("mock send failure to {}", session)));
        }

        state.sent.push(SentMessage {
            session: session.clone(),
            chain: chain.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_actions() {
        let gateway = RecordingGateway::new();
        assert_eq!(gateway.platform(), "aiocqhttp");

        gateway
            .set_group_add_request("f1", false, Some("no"))
            .await
            .unwrap();

        assert_eq!(
            gateway.actions(),
            vec![ActionCall {
                flag: "f1".to_string(),
                approve: false,
                reason: Some("no".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_failing_actions_are_still_recorded() {
        let gateway = RecordingGateway::new();
        gateway.fail_actions();

        let result = gateway.set_group_add_request("f1", true, None).await;
        assert!(matches!(result, Err(GatewayError::Action { .. })));
        assert_eq!(gateway.actions().len(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_per_session() {
        let gateway = RecordingGateway::new();
        gateway.fail_sends_to("bad");
        let chain = MessageChain::new().text("hi");

        assert!(gateway.send_message(&SessionId::new("bad"), &chain).await.is_err());
        assert!(gateway.send_message(&SessionId::new("good"), &chain).await.is_ok());
        assert_eq!(gateway.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_display_names() {
        let gateway = RecordingGateway::new();
        gateway.set_display_name("42", "Alice");

        assert_eq!(
            gateway.user_display_name("42").await.unwrap(),
            Some("Alice".to_string())
        );
        assert_eq!(gateway.user_display_name("43").await.unwrap(), None);
        assert_eq!(gateway.name_lookups(), vec!["42", "43"]);
    }
}

//! Inbound event types.

use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// A user's request to join a group, awaiting approval or rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Platform name of the connection that delivered the request.
    pub platform: String,
    /// Session the request originated from (the group's session).
    pub session: SessionId,
    /// Group the user asked to join.
    pub group_id: String,
    /// Requesting user.
    pub user_id: String,
    /// Verification comment typed by the user.
    pub comment: String,
    /// Opaque request token passed back to the approve/reject action.
    pub flag: String,
}

impl JoinRequest {
    /// Create a join request whose session is the group's own session.
    pub fn new(
        platform: impl Into<String>,
        group_id: impl Into<String>,
        user_id: impl Into<String>,
        comment: impl Into<String>,
        flag: impl Into<String>,
    ) -> Self {
        let platform = platform.into();
        let group_id = group_id.into();
        Self {
            session: SessionId::group(&platform, &group_id),
            platform,
            group_id,
            user_id: user_id.into(),
            comment: comment.into(),
            flag: flag.into(),
        }
    }
}

/// Events handed to the manager by a platform binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A group add request (`request` / `group` / `add`).
    GroupJoinRequest(JoinRequest),
    /// Anything else; carries a short description for logging.
    Unsupported { kind: String },
}

impl InboundEvent {
    /// Short description of the event kind.
    pub fn kind(&self) -> &str {
        match self {
            Self::GroupJoinRequest(_) => "group_join_request",
            Self::Unsupported { kind } => kind,
        }
    }

    pub fn as_join_request(&self) -> Option<&JoinRequest> {
        match self {
            Self::GroupJoinRequest(request) => Some(request),
            Self::Unsupported { .. } => None,
        }
    }
}

impl From<JoinRequest> for InboundEvent {
    fn from(request: JoinRequest) -> Self {
        Self::GroupJoinRequest(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_request_session() {
        let request = JoinRequest::new("aiocqhttp", "1001", "42", "hello", "flag-1");
        assert_eq!(request.session.as_str(), "aiocqhttp:GroupMessage:1001");

        let event = InboundEvent::from(request.clone());
        assert_eq!(event.kind(), "group_join_request");
        assert_eq!(event.as_join_request(), Some(&request));
    }

    #[test]
    fn test_unsupported_event() {
        let event = InboundEvent::Unsupported {
            kind: "message".to_string(),
        };
        assert_eq!(event.kind(), "message");
        assert!(event.as_join_request().is_none());
    }
}

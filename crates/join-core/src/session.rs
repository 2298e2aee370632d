//! Session identifiers used to address outbound notices.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Kind of conversation a session points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// A group chat.
    Group,
    /// A one-to-one chat.
    Private,
}

impl SessionKind {
    /// The message-type segment used inside a [`SessionId`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "GroupMessage",
            Self::Private => "FriendMessage",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "GroupMessage" => Some(Self::Group),
            "FriendMessage" | "PrivateMessage" => Some(Self::Private),
            _ => None,
        }
    }
}

/// Opaque session identifier of the form `platform:MessageType:id`.
///
/// Values read from configuration are kept verbatim; they are only split
/// into parts when a sender needs to route a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

/// The routed parts of a [`SessionId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTarget<'a> {
    pub platform: &'a str,
    pub kind: SessionKind,
    pub id: &'a str,
}

impl SessionId {
    /// Wrap a raw session string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Session of a group on the given platform.
    pub fn group(platform: &str, group_id: &str) -> Self {
        Self(format!("{}:{}:{}", platform, SessionKind::Group.as_str(), group_id))
    }

    /// Session of a private chat on the given platform.
    pub fn private(platform: &str, user_id: &str) -> Self {
        Self(format!("{}:{}:{}", platform, SessionKind::Private.as_str(), user_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the identifier into platform, kind and target id.
    pub fn target(&self) -> Result<SessionTarget<'_>, GatewayError> {
        let mut parts = self.0.splitn(3, ':');
        let platform = parts.next().unwrap_or_default();
        let kind = parts.next().and_then(SessionKind::parse);
        let id = parts.next().unwrap_or_default();

        match kind {
            Some(kind) if !platform.is_empty() && !id.is_empty() => Ok(SessionTarget {
                platform,
                kind,
                id,
            }),
            _ => Err(GatewayError::InvalidSession(self.0.clone())),
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_session_roundtrip() {
        let session = SessionId::group("aiocqhttp", "123456");
        assert_eq!(session.as_str(), "aiocqhttp:GroupMessage:123456");

        let target = session.target().unwrap();
        assert_eq!(target.platform, "aiocqhttp");
        assert_eq!(target.kind, SessionKind::Group);
        assert_eq!(target.id, "123456");
    }

    #[test]
    fn test_private_session_target() {
        let session = SessionId::new("aiocqhttp:FriendMessage:42");
        let target = session.target().unwrap();
        assert_eq!(target.kind, SessionKind::Private);
        assert_eq!(target.id, "42");
    }

    #[test]
    fn test_invalid_session() {
        for raw in ["g2", "aiocqhttp:Weird:1", "aiocqhttp:GroupMessage:", ":GroupMessage:1"] {
            let err = SessionId::new(raw).target().unwrap_err();
            assert_eq!(err, GatewayError::InvalidSession(raw.to_string()));
        }
    }
}

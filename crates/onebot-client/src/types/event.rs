//! Event posts sent by a OneBot implementation.

use join_core::ids::deserialize_id;
use join_core::{InboundEvent, JoinRequest};
use serde::Deserialize;

use crate::error::OneBotError;

/// An event post, tagged by `post_type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "post_type", rename_all = "snake_case")]
pub enum OneBotEvent {
    /// Friend or group requests.
    Request(RequestEvent),
    /// Chat messages.
    Message,
    /// Notices (member changes, recalls, ...).
    Notice,
    /// Heartbeats and lifecycle events.
    MetaEvent,
    /// Any other post type.
    #[serde(other)]
    Other,
}

/// A request event, tagged by `request_type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "request_type", rename_all = "snake_case")]
pub enum RequestEvent {
    Group(GroupRequest),
    Friend,
    #[serde(other)]
    Other,
}

/// A request to join a group (`add`) or an invitation of the bot (`invite`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupRequest {
    pub sub_type: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub group_id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(default)]
    pub comment: String,
    pub flag: String,
}

impl OneBotEvent {
    /// Parse an event post body.
    pub fn parse(body: &[u8]) -> Result<Self, OneBotError> {
        serde_json::from_slice(body).map_err(|e| OneBotError::InvalidEvent(e.to_string()))
    }

    /// Short description of the event kind.
    pub fn kind(&self) -> String {
        match self {
            Self::Request(RequestEvent::Group(r)) => format!("request.group.{}", r.sub_type),
            Self::Request(RequestEvent::Friend) => "request.friend".to_string(),
            Self::Request(RequestEvent::Other) => "request.other".to_string(),
            Self::Message => "message".to_string(),
            Self::Notice => "notice".to_string(),
            Self::MetaEvent => "meta_event".to_string(),
            Self::Other => "other".to_string(),
        }
    }

    /// Convert into the manager's event type.
    ///
    /// Only group `add` requests become join requests; everything else is
    /// reported as unsupported.
    pub fn into_inbound(self, platform: &str) -> InboundEvent {
        match self {
            Self::Request(RequestEvent::Group(r)) if r.sub_type == "add" => {
                JoinRequest::new(platform, r.group_id, r.user_id, r.comment, r.flag).into()
            }
            other => InboundEvent::Unsupported { kind: other.kind() },
        }
    }
}

//! Action parameters and responses of the OneBot v11 HTTP API.

use std::path::Path;

use join_core::{MessageChain, MessageSegment};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// An id sent as a JSON number when it is numeric, as a string otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParam(pub String);

impl Serialize for IdParam {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl From<&str> for IdParam {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A message segment in array form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    At { qq: String },
    Image { file: String },
}

impl Segment {
    /// Image segment for a local file, as a `file://` URI.
    pub fn local_image(path: &Path) -> Self {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self::Image {
            file: format!("file://{}", absolute.display()),
        }
    }

    /// Convert a message chain into segments.
    pub fn from_chain(chain: &MessageChain) -> Vec<Self> {
        chain.segments().iter().map(Self::from).collect()
    }
}

impl From<&MessageSegment> for Segment {
    fn from(segment: &MessageSegment) -> Self {
        match segment {
            MessageSegment::Text { text } => Self::Text { text: text.clone() },
            MessageSegment::Mention { user_id } => Self::At {
                qq: user_id.clone(),
            },
            MessageSegment::Image { path } => Self::local_image(path),
        }
    }
}

/// Parameters of `set_group_add_request`.
#[derive(Debug, Clone, Serialize)]
pub struct SetGroupAddRequestParams {
    pub flag: String,
    pub sub_type: String,
    pub approve: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SetGroupAddRequestParams {
    pub fn new(flag: &str, approve: bool, reason: Option<&str>) -> Self {
        Self {
            flag: flag.to_string(),
            sub_type: "add".to_string(),
            approve,
            reason: reason.map(str::to_string),
        }
    }
}

/// Parameters of `send_group_msg`.
#[derive(Debug, Clone, Serialize)]
pub struct SendGroupMsgParams {
    pub group_id: IdParam,
    pub message: Vec<Segment>,
}

/// Parameters of `send_private_msg`.
#[derive(Debug, Clone, Serialize)]
pub struct SendPrivateMsgParams {
    pub user_id: IdParam,
    pub message: Vec<Segment>,
}

/// Parameters of `get_stranger_info`.
#[derive(Debug, Clone, Serialize)]
pub struct GetStrangerInfoParams {
    pub user_id: IdParam,
    pub no_cache: bool,
}

/// Result of `get_stranger_info`.
#[derive(Debug, Clone, Deserialize)]
pub struct StrangerInfo {
    #[serde(default)]
    pub nickname: String,
}

/// Result of `get_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusInfo {
    #[serde(default)]
    pub online: Option<bool>,
    #[serde(default)]
    pub good: bool,
}

/// Envelope of every action response.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    #[serde(default)]
    pub retcode: i64,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub wording: Option<String>,
}

impl ActionResponse {
    /// `ok`, or `async` for actions queued by the implementation.
    pub fn is_ok(&self) -> bool {
        self.status == "ok" || self.status == "async"
    }

    /// Best available failure description.
    pub fn error_message(&self) -> String {
        self.wording
            .clone()
            .or_else(|| self.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.status.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segments_wire_form() {
        let chain = MessageChain::new()
            .mention("42")
            .text("hi")
            .image("/tmp/chart.png");

        let value = serde_json::to_value(Segment::from_chain(&chain)).unwrap();
        assert_eq!(
            value,
            json!([
                {"type": "at", "data": {"qq": "42"}},
                {"type": "text", "data": {"text": "hi"}},
                {"type": "image", "data": {"file": "file:///tmp/chart.png"}},
            ])
        );
    }

    #[test]
    fn test_id_param() {
        let params = SendGroupMsgParams {
            group_id: IdParam::from("1001"),
            message: Vec::new(),
        };
        assert_eq!(serde_json::to_value(&params).unwrap()["group_id"], json!(1001));

        let params = SendPrivateMsgParams {
            user_id: IdParam::from("u_abc"),
            message: Vec::new(),
        };
        assert_eq!(serde_json::to_value(&params).unwrap()["user_id"], json!("u_abc"));
    }

    #[test]
    fn test_set_group_add_request_params() {
        let value =
            serde_json::to_value(SetGroupAddRequestParams::new("f", true, None)).unwrap();
        assert_eq!(value, json!({"flag": "f", "sub_type": "add", "approve": true}));

        let value =
            serde_json::to_value(SetGroupAddRequestParams::new("f", false, Some("no"))).unwrap();
        assert_eq!(value["reason"], json!("no"));
    }

    #[test]
    fn test_action_response() {
        let ok: ActionResponse =
            serde_json::from_value(json!({"status": "ok", "retcode": 0, "data": null})).unwrap();
        assert!(ok.is_ok());

        let failed: ActionResponse = serde_json::from_value(
            json!({"status": "failed", "retcode": 100, "data": null, "wording": "请求已处理"}),
        )
        .unwrap();
        assert!(!failed.is_ok());
        assert_eq!(failed.error_message(), "请求已处理");
    }
}

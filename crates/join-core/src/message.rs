//! Outbound message segments.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single piece of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageSegment {
    /// Plain text.
    Text { text: String },
    /// A mention of a user.
    Mention { user_id: String },
    /// An image read from the local file system.
    Image { path: PathBuf },
}

/// An ordered list of segments delivered as one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageChain {
    segments: Vec<MessageSegment>,
}

impl MessageChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text segment.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(MessageSegment::Text { text: text.into() });
        self
    }

    /// Append a mention segment.
    pub fn mention(mut self, user_id: impl Into<String>) -> Self {
        self.segments.push(MessageSegment::Mention {
            user_id: user_id.into(),
        });
        self
    }

    /// Append an image segment.
    pub fn image(mut self, path: impl AsRef<Path>) -> Self {
        self.segments.push(MessageSegment::Image {
            path: path.as_ref().to_path_buf(),
        });
        self
    }

    pub fn segments(&self) -> &[MessageSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if the chain carries an image.
    pub fn has_image(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, MessageSegment::Image { .. }))
    }

    /// Concatenated text content, used for logging.
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                MessageSegment::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl IntoIterator for MessageChain {
    type Item = MessageSegment;
    type IntoIter = std::vec::IntoIter<MessageSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let chain = MessageChain::new()
            .mention("42")
            .text("hello")
            .image("/tmp/chart.png");

        assert_eq!(
            chain.segments(),
            &[
                MessageSegment::Mention {
                    user_id: "42".to_string()
                },
                MessageSegment::Text {
                    text: "hello".to_string()
                },
                MessageSegment::Image {
                    path: PathBuf::from("/tmp/chart.png")
                },
            ]
        );
        assert!(chain.has_image());
        assert_eq!(chain.plain_text(), "hello");
    }

    #[test]
    fn test_serialize_segments() {
        let chain = MessageChain::new().text("hi").mention("7");
        let json = serde_json::to_value(&chain).unwrap();
        assert_eq!(json[0]["type"], "text");
        assert_eq!(json[1]["type"], "mention");
        assert_eq!(json[1]["user_id"], "7");
    }
}

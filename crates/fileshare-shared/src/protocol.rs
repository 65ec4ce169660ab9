use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SharedError;
use crate::types::User;

/// A chat message as carried on the broadcast channel.
///
/// `id` is the deduplication key: every session merging a message it has
/// already seen must treat the merge as a no-op. `timestamp` is wall-clock
/// milliseconds and is the sort key of the log; ties keep insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender: User,
    pub timestamp: i64,
    #[serde(flatten)]
    pub payload: Payload,
}

/// Variant payload of a [`Message`].
///
/// Serialized with an adjacent `type` tag flattened into the message object,
/// so the JSON shape is `{"id": .., "type": "text", "content": ..}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Payload {
    /// Plain text typed by a user
    Text { content: String },
    /// A file attachment, fully embedded as a data URL
    File { file: FileAttachment },
    /// An assistant-generated summary of a shared link
    Summary { url: String, summary: String },
    /// System notice (e.g. join announcements)
    Info { content: String },
}

/// A self-contained file attachment. There is no shared blob store, so the
/// bytes travel inside the message as a `data:` URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileAttachment {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub url: String,
}

/// Current wall-clock time in milliseconds, the message logical clock.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl Message {
    fn stamped(sender: User, timestamp: i64, payload: Payload) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            timestamp,
            payload,
        }
    }

    pub fn text(sender: User, content: impl Into<String>) -> Self {
        Self::stamped(
            sender,
            now_millis(),
            Payload::Text {
                content: content.into(),
            },
        )
    }

    pub fn file(sender: User, file: FileAttachment) -> Self {
        Self::stamped(sender, now_millis(), Payload::File { file })
    }

    /// Build a summary message derived from a triggering message.
    ///
    /// The timestamp is `trigger_timestamp + 1` so the summary sorts directly
    /// after its trigger even when the clock has not advanced.
    pub fn summary(url: impl Into<String>, summary: impl Into<String>, trigger_timestamp: i64) -> Self {
        Self::stamped(
            User::assistant(),
            trigger_timestamp + 1,
            Payload::Summary {
                url: url.into(),
                summary: summary.into(),
            },
        )
    }

    pub fn info(sender: User, content: impl Into<String>) -> Self {
        Self::stamped(
            sender,
            now_millis(),
            Payload::Info {
                content: content.into(),
            },
        )
    }

    /// Serialize to wire JSON
    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from wire JSON
    pub fn from_json(data: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roundtrip() {
        let msg = Message::text(User::random(), "hello tabs");
        let json = msg.to_json().unwrap();
        let restored = Message::from_json(&json).unwrap();
        assert_eq!(msg, restored);
    }

    #[test]
    fn test_wire_shape_matches_channel_schema() {
        // Older sessions parse these exact field names; the schema carries
        // no version field, so the shape is load-bearing.
        let msg = Message::text(User::assistant(), "hi");
        let v: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(v["type"], "text");
        assert_eq!(v["content"], "hi");
        assert!(v["sender"]["avatarColor"].is_string());
        assert!(v["timestamp"].is_i64());
    }

    #[test]
    fn test_file_attachment_wire_shape() {
        let msg = Message::file(
            User::random(),
            FileAttachment {
                name: "notes.txt".into(),
                mime_type: "text/plain".into(),
                size: 12,
                url: "data:text/plain;base64,aGVsbG8gd29ybGQh".into(),
            },
        );
        let v: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(v["type"], "file");
        assert_eq!(v["file"]["type"], "text/plain");
        assert_eq!(v["file"]["size"], 12);
    }

    #[test]
    fn test_summary_follows_trigger() {
        let trigger = Message::text(User::random(), "see https://example.com");
        let summary = Message::summary("https://example.com", "An example.", trigger.timestamp);
        assert_eq!(summary.timestamp, trigger.timestamp + 1);
        assert!(summary.sender.is_assistant());
    }
}

use serde::{Deserialize, Serialize};

use super::role::Role;
use super::tool::Tool;

/// A remote assistant definition. Created once and reused; immutable for the
/// lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Everything needed to create an [`Assistant`] on the platform.
#[derive(Debug, Clone)]
pub struct AssistantSpec {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub tools: Vec<Tool>,
}

/// A remote-held conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextValue {
    pub value: String,
}

/// One content block inside a thread message. The platform can attach block
/// kinds we never produce (images, files); those deserialize to `Other` and
/// are skipped when reading reply text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextValue },
    #[serde(other)]
    Other,
}

impl MessageContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text { text } => Some(&text.value),
            MessageContent::Other => None,
        }
    }
}

/// A message stored on a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: Role,
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    /// Text of the first textual content block, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| block.as_text())
    }
}

/// A page of thread messages, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thread_message_text() {
        let message: ThreadMessage = serde_json::from_value(json!({
            "id": "msg_1",
            "role": "assistant",
            "content": [
                {"type": "image_file", "image_file": {"file_id": "file_1"}},
                {"type": "text", "text": {"value": "hello", "annotations": []}}
            ]
        }))
        .unwrap();

        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text(), Some("hello"));
    }

    #[test]
    fn test_message_list_most_recent_first() {
        let list: MessageList = serde_json::from_value(json!({
            "data": [
                {"id": "msg_2", "role": "assistant", "content": [{"type": "text", "text": {"value": "latest"}}]},
                {"id": "msg_1", "role": "user", "content": [{"type": "text", "text": {"value": "older"}}]}
            ]
        }))
        .unwrap();

        assert_eq!(list.data[0].text(), Some("latest"));
    }
}

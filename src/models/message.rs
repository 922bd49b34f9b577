use serde::{Deserialize, Serialize};

/// Body of a conversation message. `action` carries the marker of the
/// action that produced it, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
        }
    }

    pub fn with_action(text: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Some(action.into()),
        }
    }
}

/// A message as stored by the host, scoped to a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub room_id: String,
    pub content: Content,
}

impl Memory {
    pub fn new(room_id: impl Into<String>, content: Content) -> Self {
        Self {
            room_id: room_id.into(),
            content,
        }
    }

    pub fn user_text(room_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(room_id, Content::text(text))
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.content.action.as_deref() == Some(action)
    }
}

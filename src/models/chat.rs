use serde::{ Serialize, Deserialize };
use uuid::Uuid;

use crate::session::SessionId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Delivery state of a user message. `Delivered` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Delivered,
    Failed,
}

impl MessageStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MessageStatus::Pending)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Only user messages carry a status.
    pub status: Option<MessageStatus>,
    pub session_id: SessionId,
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, session_id: SessionId) -> Self {
        Self::build(Role::User, content.into(), Some(MessageStatus::Pending), session_id)
    }

    pub fn assistant(content: impl Into<String>, session_id: SessionId) -> Self {
        Self::build(Role::Assistant, content.into(), None, session_id)
    }

    fn build(
        role: Role,
        content: String,
        status: Option<MessageStatus>,
        session_id: SessionId
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            status,
            session_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == Some(MessageStatus::Pending)
    }
}

/// Read-only view of the conversation handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatSnapshot {
    pub session_id: SessionId,
    pub messages: Vec<ChatMessage>,
    pub awaiting_response: bool,
    pub input: String,
}

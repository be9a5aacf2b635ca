//! Chat wire types and the in-memory transcript entry.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn as sent to the chat endpoint and the upstream model.
///
/// Unknown fields (ids, timestamps) sent by callers are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
}

/// A displayed chat message. Lives only in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub role: ChatRole,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn with_id(id: impl Into<String>, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::new(role, content)
        }
    }

    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn::new(self.role, self.content.clone())
    }
}

/// Event relayed to chat clients as an SSE `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatStreamEvent {
    Token { content: String },
    Done,
    Error { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ignores_extra_fields() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"messages":[{"id":"welcome","role":"assistant","content":"你好！"},{"role":"user","content":"hi","createdAt":"now"}]}"#,
        )
        .unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, ChatRole::Assistant);
        assert_eq!(request.messages[1].content, "hi");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<ChatRequest, _> =
            serde_json::from_str(r#"{"messages":[{"role":"tool","content":"x"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_stream_event_wire_format() {
        let token = serde_json::to_string(&ChatStreamEvent::Token {
            content: "你".to_string(),
        })
        .unwrap();
        assert_eq!(token, r#"{"type":"token","content":"你"}"#);
        assert_eq!(
            serde_json::to_string(&ChatStreamEvent::Done).unwrap(),
            r#"{"type":"done"}"#
        );
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::new(ChatRole::User, "a");
        let b = ChatMessage::new(ChatRole::User, "a");
        assert_ne!(a.id, b.id);
        assert_eq!(ChatMessage::with_id("welcome", ChatRole::Assistant, "hi").id, "welcome");
    }

    #[test]
    fn test_message_timestamp_serializes_as_rfc3339() {
        let message = ChatMessage::new(ChatRole::Assistant, "好");
        let json = serde_json::to_value(&message).unwrap();
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
        assert_eq!(json["role"], "assistant");
    }
}

//! Chat client for `POST /api/chat` and the in-memory practice transcript.

use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::{debug, warn};

use super::speech::{ClientError, ClientResult, api_error};
use crate::core::chat::stream::{SseData, SseLineDecoder};
use crate::core::chat::{ChatMessage, ChatRequest, ChatRole, ChatStreamEvent, ChatTurn};

pub const WELCOME_MESSAGE_ID: &str = "welcome";
pub const WELCOME_MESSAGE: &str = "你好！我是你的中文老师小美。我们今天学习什么？(Nǐ hǎo! Wǒ shì nǐ de zhōngwén lǎoshī Xiǎo Měi.)";

/// Practice conversation, seeded with the tutor's greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::with_id(
                WELCOME_MESSAGE_ID,
                ChatRole::Assistant,
                WELCOME_MESSAGE,
            )],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, content));
        &self.messages[self.messages.len() - 1]
    }

    /// Turns sent upstream: the whole transcript, greeting included.
    pub fn turns(&self) -> Vec<ChatTurn> {
        self.messages.iter().map(ChatMessage::to_turn).collect()
    }
}

pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// Post the turns and return the decoded event stream.
    pub async fn stream(
        &self,
        turns: Vec<ChatTurn>,
    ) -> ClientResult<BoxStream<'static, ClientResult<ChatStreamEvent>>> {
        let response = self
            .http
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(&ChatRequest { messages: turns })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let mut bytes = response.bytes_stream();
        let events = async_stream::try_stream! {
            let mut decoder = SseLineDecoder::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(|e| ClientError::Network(e.to_string()))?;
                for data in decoder.push(&chunk) {
                    if let Some(event) = decode_event(data) {
                        yield event;
                    }
                }
            }
            if let Some(event) = decoder.finish().and_then(decode_event) {
                yield event;
            }
        };

        Ok(events.boxed())
    }

    /// Send `text` as the next user turn and stream the reply.
    ///
    /// `on_token` sees every delta as it arrives. The completed reply is
    /// appended to the conversation and returned. A failed exchange leaves the
    /// user turn in place and appends nothing.
    pub async fn reply<F>(
        &self,
        conversation: &mut Conversation,
        text: &str,
        mut on_token: F,
    ) -> ClientResult<String>
    where
        F: FnMut(&str) + Send,
    {
        conversation.push(ChatRole::User, text);
        let mut events = self.stream(conversation.turns()).await?;

        let mut content = String::new();
        while let Some(event) = events.next().await {
            match event? {
                ChatStreamEvent::Token { content: token } => {
                    on_token(&token);
                    content.push_str(&token);
                }
                ChatStreamEvent::Error { error } => return Err(ClientError::Stream(error)),
                ChatStreamEvent::Done => break,
            }
        }

        debug!(chars = content.chars().count(), "Tutor reply received");
        conversation.push(ChatRole::Assistant, content.clone());
        Ok(content)
    }
}

fn decode_event(data: SseData) -> Option<ChatStreamEvent> {
    match data {
        SseData::Done => Some(ChatStreamEvent::Done),
        SseData::Payload(payload) => match serde_json::from_str(&payload) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Ignoring malformed chat event: {}", e);
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_seeded_with_welcome() {
        let conversation = Conversation::new();
        let first = &conversation.messages()[0];
        assert_eq!(first.id, "welcome");
        assert_eq!(first.role, ChatRole::Assistant);
        assert!(first.content.starts_with("你好！我是你的中文老师小美。"));
    }

    #[test]
    fn test_turns_follow_transcript() {
        let mut conversation = Conversation::new();
        conversation.push(ChatRole::User, "How do I say hello?");
        let turns = conversation.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, ChatRole::Assistant);
        assert_eq!(turns[1].content, "How do I say hello?");
    }

    #[test]
    fn test_decode_event() {
        assert_eq!(
            decode_event(SseData::Payload(r#"{"type":"token","content":"你"}"#.into())),
            Some(ChatStreamEvent::Token {
                content: "你".to_string()
            })
        );
        assert_eq!(decode_event(SseData::Payload("{oops".into())), None);
        assert_eq!(decode_event(SseData::Done), Some(ChatStreamEvent::Done));
    }
}

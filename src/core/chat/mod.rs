//! Tutor chat: upstream completion client, SSE decoding and wire types.

mod client;
mod messages;
pub mod stream;

pub use client::{
    ChatCompletionClient, ChatConfig, ChatError, ChatResult, DEEPINFRA_CHAT_URL,
    DEFAULT_CHAT_MODEL, DEFAULT_TUTOR_PROMPT,
};
pub use messages::{ChatMessage, ChatRequest, ChatRole, ChatStreamEvent, ChatTurn};

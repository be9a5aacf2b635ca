pub mod chat;
pub mod tts;

// Re-export commonly used types for convenience
pub use tts::{
    AudioData, BaseTTS, BoxedTTS, GoogleTranslateTTS, OpenAITTS, OpenAIVoice, SpeechFailure,
    SpeechPipeline, SpeechResponse, Synthesis, TTSConfig, TTSError, TTSResult, Utterance,
    UtteranceError,
};

pub use chat::{
    ChatCompletionClient, ChatConfig, ChatError, ChatMessage, ChatRequest, ChatResult, ChatRole,
    ChatStreamEvent, ChatTurn,
};

//! Client side of the gateway: speech dispatch, playback and tutor chat.
//!
//! - `speech` - `POST /api/tts` dispatcher
//! - `player` - bounded playback over an [`AudioSink`]
//! - `sink` - file and external-command sinks
//! - `chat` - `POST /api/chat` stream consumer and transcript
//! - `tutor` - speaks the Chinese part of tutor replies

pub mod chat;
pub mod player;
pub mod sink;
pub mod speech;
pub mod tutor;

pub use chat::{ChatClient, Conversation};
pub use player::{
    AudioPlayer, AudioSink, DEFAULT_PLAYBACK_TIMEOUT, MediaErrorCode, PlaybackOutcome,
    TUTOR_PLAYBACK_TIMEOUT,
};
pub use sink::{CommandSink, FileSink};
pub use speech::{ClientError, ClientResult, SpeechClient, SpeechReply};
pub use tutor::{Tutor, extract_chinese_text, toast_message};

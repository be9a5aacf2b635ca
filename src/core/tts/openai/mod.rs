//! OpenAI TTS provider module.
//!
//! This is the primary, paid provider. It honours the learner's voice preset and
//! always requests mp3 so the payload can be played directly from a data URL.
//!
//! # Supported Voices
//!
//! alloy, echo, fable, onyx, nova, shimmer

mod config;
mod provider;

pub use config::{OpenAITTSModel, OpenAIVoice};
pub use provider::{OPENAI_TTS_URL, OpenAITTS};

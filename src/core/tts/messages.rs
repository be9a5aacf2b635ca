//! Wire types of the speech endpoint, shared by the server and the client.

use serde::{Deserialize, Serialize};

use super::openai::OpenAIVoice;
use super::pipeline::Synthesis;

/// Body of `POST /api/tts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, voice: Option<OpenAIVoice>) -> Self {
        Self {
            text: text.into(),
            voice: voice.map(|v| v.as_str().to_string()),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Successful reply of `POST /api/tts`.
///
/// `fallback` is serialized only when the secondary provider produced the audio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechResponse {
    pub text: String,
    #[serde(rename = "audioData")]
    pub audio_data: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fallback: bool,
}

impl From<Synthesis> for SpeechResponse {
    fn from(synthesis: Synthesis) -> Self {
        Self {
            audio_data: synthesis.audio.to_data_url(),
            text: synthesis.text,
            fallback: synthesis.fallback_used,
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::core::tts::OpenAIVoice;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voice {
    /// Voice preset sent to the speech endpoint
    pub id: String,
    /// Display name of the voice
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoicesResponse {
    pub default: String,
    pub voices: Vec<Voice>,
}

/// List the voice presets accepted by `POST /api/tts`.
pub async fn list_voices() -> Json<VoicesResponse> {
    let voices = OpenAIVoice::all()
        .iter()
        .map(|voice| Voice {
            id: voice.as_str().to_string(),
            name: voice.display_name().to_string(),
        })
        .collect();

    Json(VoicesResponse {
        default: OpenAIVoice::default().as_str().to_string(),
        voices,
    })
}

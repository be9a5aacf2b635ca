use std::sync::Arc;

use axum::{body::Bytes, extract::State, response::Json};
use tracing::{debug, info};

use crate::core::tts::{SpeechResponse, Utterance};
use crate::errors::AppResult;
use crate::state::AppState;

/// Speak an utterance through the primary provider, falling back on quota exhaustion.
///
/// The body is read as raw bytes so that malformed JSON is validated like an
/// empty object instead of being rejected by the extractor.
///
/// Checks run in order and stop at the first failure:
/// 1. `text` must be a non-empty string (400)
/// 2. the primary credential must be configured (500)
/// 3. the provider pipeline decides the rest (200/403/503)
pub async fn tts_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<SpeechResponse>> {
    let utterance = Utterance::from_json_bytes(&body)?;
    debug!(
        chars = utterance.text.chars().count(),
        voice = utterance.voice.as_str(),
        "TTS request"
    );

    let pipeline = state.speech_pipeline()?;
    let synthesis = pipeline.synthesize(&utterance).await?;

    if synthesis.fallback_used {
        info!("TTS request served by fallback provider");
    }

    Ok(Json(SpeechResponse::from(synthesis)))
}

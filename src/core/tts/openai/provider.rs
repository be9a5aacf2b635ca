//! OpenAI TTS provider implementation.
//!
//! This module provides the OpenAI TTS provider that implements the `BaseTTS` trait
//! using OpenAI's text-to-speech API.
//!
//! # API Reference
//!
//! - Endpoint: `POST https://api.openai.com/v1/audio/speech`
//! - Models: tts-1, tts-1-hd
//! - Voices: alloy, echo, fable, onyx, nova, shimmer
//! - Output: mp3

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use tracing::{debug, error};

use super::config::OpenAITTSModel;
use crate::core::tts::base::{
    AudioData, BaseTTS, DEFAULT_AUDIO_MIME, TTSConfig, TTSError, TTSResult,
};
use crate::core::tts::utterance::Utterance;

/// OpenAI TTS API endpoint
pub const OPENAI_TTS_URL: &str = "https://api.openai.com/v1/audio/speech";

/// Map a non-success OpenAI status onto the error taxonomy.
///
/// 429 is quota exhaustion, 401/402 are credential or billing failures, every
/// other status is a generic provider error.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> TTSError {
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    } else {
        body.trim().to_string()
    };

    match status.as_u16() {
        429 => TTSError::QuotaExceeded(message),
        401 | 402 => TTSError::Unauthorized(message),
        code => TTSError::ProviderError {
            status: code,
            message,
        },
    }
}

/// OpenAI TTS provider using the Audio Speech API
///
/// # Example
///
/// ```rust,ignore
/// use mandarin_gateway::core::tts::{BaseTTS, OpenAITTS, TTSConfig, Utterance};
///
/// #[tokio::main]
/// async fn main() {
///     let config = TTSConfig {
///         api_key: "sk-...".to_string(),
///         endpoint: mandarin_gateway::core::tts::OPENAI_TTS_URL.to_string(),
///         ..Default::default()
///     };
///
///     let tts = OpenAITTS::new(reqwest::Client::new(), config).unwrap();
///     let utterance = Utterance::new("你好", Some("nova")).unwrap();
///     let audio = tts.synthesize(&utterance).await.unwrap();
///     println!("{} bytes", audio.data.len());
/// }
/// ```
pub struct OpenAITTS {
    client: reqwest::Client,
    config: TTSConfig,
    model: OpenAITTSModel,
}

impl OpenAITTS {
    /// Create a new OpenAI TTS instance
    ///
    /// Fails when the credential is empty, so a missing key never reaches the network.
    pub fn new(client: reqwest::Client, config: TTSConfig) -> TTSResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "OpenAI API key is required".to_string(),
            ));
        }

        let model = if config.model.is_empty() {
            OpenAITTSModel::default()
        } else {
            OpenAITTSModel::from_str_or_default(&config.model)
        };

        Ok(Self {
            client,
            config,
            model,
        })
    }

    /// Get the configured model
    pub fn model(&self) -> OpenAITTSModel {
        self.model
    }

    /// Endpoint the speech request is sent to
    pub fn endpoint(&self) -> &str {
        if self.config.endpoint.is_empty() {
            OPENAI_TTS_URL
        } else {
            &self.config.endpoint
        }
    }

    fn build_http_request(&self, utterance: &Utterance) -> reqwest::RequestBuilder {
        let body = json!({
            "model": self.model.as_str(),
            "voice": utterance.voice.as_str(),
            "input": utterance.text,
        });

        self.client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .json(&body)
    }
}

#[async_trait]
impl BaseTTS for OpenAITTS {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    async fn synthesize(&self, utterance: &Utterance) -> TTSResult<AudioData> {
        debug!(
            text_len = utterance.text.len(),
            voice = %utterance.voice,
            model = %self.model,
            "OpenAI TTS synthesis request"
        );

        let response = self
            .build_http_request(utterance)
            .send()
            .await
            .map_err(|e| {
                error!("OpenAI TTS request failed: {}", e);
                TTSError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TTSError::NetworkError(format!("Failed to read audio body: {e}")))?;

        if bytes.is_empty() {
            return Err(TTSError::AudioGenerationFailed(
                "OpenAI returned an empty audio body".to_string(),
            ));
        }

        Ok(AudioData::new(bytes.to_vec(), DEFAULT_AUDIO_MIME))
    }
}

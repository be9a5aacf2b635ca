//! Shared TTS types: provider trait, configuration, audio payloads and errors.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use thiserror::Error;

use super::utterance::Utterance;

/// MIME type both providers answer with.
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Errors raised by a single TTS provider call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TTSError {
    /// Provider rejected the request because the account quota is exhausted (HTTP 429)
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),
    /// Credential or billing failure (HTTP 401/402)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Any other non-success HTTP status
    #[error("Provider error ({status}): {message}")]
    ProviderError { status: u16, message: String },
    /// The provider could not be reached
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The provider answered successfully but produced no usable audio
    #[error("Audio generation failed: {0}")]
    AudioGenerationFailed(String),
}

pub type TTSResult<T> = Result<T, TTSError>;

/// Provider configuration.
///
/// A provider only reads the fields it understands: the Google Translate
/// endpoint has no credential and no model, OpenAI ignores `language`.
#[derive(Debug, Clone)]
pub struct TTSConfig {
    /// Bearer credential (empty for unauthenticated providers)
    pub api_key: String,
    /// Full endpoint URL
    pub endpoint: String,
    /// Model identifier (e.g. "tts-1")
    pub model: String,
    /// Language code for providers without voice selection (e.g. "zh-CN")
    pub language: Option<String>,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for TTSConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            model: "tts-1".to_string(),
            language: None,
            request_timeout_secs: 10,
        }
    }
}

/// Encoded audio returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioData {
    /// Raw encoded audio bytes
    pub data: Vec<u8>,
    /// MIME type of `data`
    pub format: String,
}

/// Errors raised while decoding a `data:` URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a data URL")]
    MissingScheme,
    #[error("data URL is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(String),
}

impl AudioData {
    pub fn new(data: Vec<u8>, format: impl Into<String>) -> Self {
        Self {
            data,
            format: format.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Encode as `data:<mime>;base64,<payload>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.format, BASE64.encode(&self.data))
    }

    /// Decode a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self, DataUrlError> {
        let rest = url.strip_prefix("data:").ok_or(DataUrlError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingScheme)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(DataUrlError::NotBase64)?;

        let data = BASE64
            .decode(payload.trim())
            .map_err(|e| DataUrlError::InvalidPayload(e.to_string()))?;

        let format = if mime.is_empty() {
            "text/plain".to_string()
        } else {
            mime.to_string()
        };

        Ok(Self { data, format })
    }
}

/// A text-to-speech backend that turns one utterance into encoded audio.
///
/// Implementations perform exactly one upstream call per `synthesize` and never
/// retry; fallback between providers is the pipeline's concern.
#[async_trait]
pub trait BaseTTS: Send + Sync {
    /// Short provider identifier used in logs
    fn provider_name(&self) -> &'static str;

    /// Synthesize the utterance
    async fn synthesize(&self, utterance: &Utterance) -> TTSResult<AudioData>;
}

pub type BoxedTTS = Arc<dyn BaseTTS>;

//! Dispatches utterances to a running gateway's speech endpoint.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::tts::{OpenAIVoice, SpeechRequest};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Gateway answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },
    /// Success status without an `audioData` field
    #[error("No audio returned")]
    NoAudio,
    #[error("Network error: {0}")]
    Network(String),
    /// Chat stream failed after it started
    #[error("{0}")]
    Stream(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Turn a non-success response body into an [`ClientError::Api`].
///
/// The body's `error` field is used when present, `API <status>` otherwise.
pub(crate) fn api_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("API {status}"));

    ClientError::Api { status, message }
}

/// Audio returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechReply {
    pub text: String,
    /// `data:<mime>;base64,<payload>`
    pub audio_data: String,
    /// Produced by the fallback provider
    pub fallback: bool,
}

pub struct SpeechClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl SpeechClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/tts", self.base_url)
    }

    /// Request speech for `text`.
    ///
    /// A voice outside the allow-list cannot be expressed here; the gateway
    /// applies its default when `voice` is `None`.
    pub async fn speak(&self, text: &str, voice: Option<OpenAIVoice>) -> ClientResult<SpeechReply> {
        debug!(text, voice = ?voice, "Requesting TTS");

        let response = self
            .http
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(&SpeechRequest::new(text, voice))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        let json: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let audio_data = json
            .get("audioData")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(ClientError::NoAudio)?
            .to_string();
        let fallback = json.get("fallback").and_then(Value::as_bool).unwrap_or(false);

        if fallback {
            info!("Used Google fallback TTS");
        }

        Ok(SpeechReply {
            text: json
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or(text)
                .to_string(),
            audio_data,
            fallback,
        })
    }
}

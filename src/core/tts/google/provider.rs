use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::core::tts::base::{
    AudioData, BaseTTS, DEFAULT_AUDIO_MIME, TTSConfig, TTSError, TTSResult,
};
use crate::core::tts::utterance::Utterance;

/// Google Translate TTS endpoint
pub const GOOGLE_TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";

const DEFAULT_LANGUAGE: &str = "zh-CN";

/// Free Google Translate text-to-speech.
///
/// The voice preset on the utterance is ignored; the language code decides the
/// speaker.
pub struct GoogleTranslateTTS {
    client: reqwest::Client,
    endpoint: String,
    language: String,
    request_timeout: Duration,
}

impl GoogleTranslateTTS {
    pub fn new(client: reqwest::Client, config: TTSConfig) -> Self {
        let endpoint = if config.endpoint.is_empty() {
            GOOGLE_TRANSLATE_TTS_URL.to_string()
        } else {
            config.endpoint
        };

        Self {
            client,
            endpoint,
            language: config
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BaseTTS for GoogleTranslateTTS {
    fn provider_name(&self) -> &'static str {
        "google-translate"
    }

    async fn synthesize(&self, utterance: &Utterance) -> TTSResult<AudioData> {
        debug!(
            text_len = utterance.text.len(),
            language = %self.language,
            "Google Translate TTS synthesis request"
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", utterance.text.as_str()),
                ("tl", self.language.as_str()),
                ("client", "tw-ob"),
            ])
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                error!("Google Translate TTS request failed: {}", e);
                TTSError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TTSError::ProviderError {
                status: status.as_u16(),
                message: format!("Google TTS failed: {}", status.as_u16()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TTSError::NetworkError(format!("Failed to read audio body: {e}")))?;

        if bytes.is_empty() {
            return Err(TTSError::AudioGenerationFailed(
                "Google TTS returned an empty audio body".to_string(),
            ));
        }

        Ok(AudioData::new(bytes.to_vec(), DEFAULT_AUDIO_MIME))
    }
}

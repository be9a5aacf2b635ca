mod base;
pub mod google;
pub mod messages;
pub mod openai;
mod pipeline;
mod utterance;

pub use base::{
    AudioData, BaseTTS, BoxedTTS, DEFAULT_AUDIO_MIME, DataUrlError, TTSConfig, TTSError,
    TTSResult,
};
pub use google::{GOOGLE_TRANSLATE_TTS_URL, GoogleTranslateTTS};
pub use messages::{ErrorBody, SpeechRequest, SpeechResponse};
pub use openai::{OPENAI_TTS_URL, OpenAITTS, OpenAITTSModel, OpenAIVoice};
pub use pipeline::{SpeechFailure, SpeechPipeline, Synthesis};
pub use utterance::{Utterance, UtteranceError};

use std::sync::Arc;

/// Factory function to create a TTS provider.
///
/// # Supported Providers
///
/// - `"openai"` - OpenAI Audio Speech API (primary, requires an API key)
/// - `"google"` or `"google-translate"` - Google Translate TTS (fallback, no key)
///
/// # Example
///
/// ```rust,ignore
/// use mandarin_gateway::core::tts::{create_tts_provider, TTSConfig};
///
/// let config = TTSConfig {
///     api_key: "sk-...".to_string(),
///     ..Default::default()
/// };
///
/// let provider = create_tts_provider("openai", reqwest::Client::new(), config)?;
/// ```
pub fn create_tts_provider(
    provider_type: &str,
    client: reqwest::Client,
    config: TTSConfig,
) -> TTSResult<BoxedTTS> {
    match provider_type.to_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAITTS::new(client, config)?)),
        "google" | "google-translate" | "google_translate" => {
            Ok(Arc::new(GoogleTranslateTTS::new(client, config)))
        }
        _ => Err(TTSError::InvalidConfiguration(format!(
            "Unsupported TTS provider: {provider_type}. Supported providers: openai, google-translate"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai_tts_provider() {
        let config = TTSConfig {
            api_key: "test_key".to_string(),
            ..Default::default()
        };
        let provider = create_tts_provider("OpenAI", reqwest::Client::new(), config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_openai_without_key_fails() {
        let result = create_tts_provider("openai", reqwest::Client::new(), TTSConfig::default());
        assert!(matches!(result, Err(TTSError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_create_google_tts_provider_aliases() {
        for name in ["google", "google-translate", "Google_Translate"] {
            let provider =
                create_tts_provider(name, reqwest::Client::new(), TTSConfig::default()).unwrap();
            assert_eq!(provider.provider_name(), "google-translate");
        }
    }

    #[test]
    fn test_invalid_provider_error_message() {
        let result = create_tts_provider("invalid", reqwest::Client::new(), TTSConfig::default());
        match result {
            Err(TTSError::InvalidConfiguration(msg)) => {
                assert!(msg.contains("openai"));
                assert!(msg.contains("google-translate"));
            }
            Err(other) => panic!("Expected InvalidConfiguration error, got: {:?}", other),
            Ok(_) => panic!("Expected error for invalid provider"),
        }
    }
}

//! Primary → secondary speech synthesis.
//!
//! The pipeline makes at most two upstream calls: one to the primary provider
//! and, only when the primary reports quota exhaustion, one to the secondary.

use thiserror::Error;
use tracing::{error, info, warn};

use super::base::{AudioData, BoxedTTS, TTSError};
use super::utterance::Utterance;

/// Successful synthesis of an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub text: String,
    pub audio: AudioData,
    /// True when the secondary provider produced the audio
    pub fallback_used: bool,
}

/// Terminal outcome of a failed synthesis.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpeechFailure {
    /// Primary rejected the credential or billing state; the fallback is never tried
    #[error("primary provider unauthorized: {0}")]
    Unauthorized(TTSError),
    /// Primary failed for a reason other than quota
    #[error("primary provider unavailable: {0}")]
    Unavailable(TTSError),
    /// Primary hit its quota and the secondary failed too
    #[error("fallback provider failed after quota exhaustion: {secondary}")]
    FallbackFailed {
        primary: TTSError,
        secondary: TTSError,
    },
    /// Provider could not be used as configured
    #[error("provider misconfigured: {0}")]
    Misconfigured(TTSError),
}

pub struct SpeechPipeline {
    primary: BoxedTTS,
    secondary: BoxedTTS,
}

impl SpeechPipeline {
    pub fn new(primary: BoxedTTS, secondary: BoxedTTS) -> Self {
        Self { primary, secondary }
    }

    pub async fn synthesize(&self, utterance: &Utterance) -> Result<Synthesis, SpeechFailure> {
        match self.primary.synthesize(utterance).await {
            Ok(audio) => {
                info!(
                    provider = self.primary.provider_name(),
                    bytes = audio.data.len(),
                    "Speech synthesized"
                );
                Ok(Synthesis {
                    text: utterance.text.clone(),
                    audio,
                    fallback_used: false,
                })
            }
            Err(primary @ TTSError::QuotaExceeded(_)) => {
                warn!(
                    primary = self.primary.provider_name(),
                    secondary = self.secondary.provider_name(),
                    "Primary TTS quota exhausted, using fallback provider"
                );
                self.synthesize_fallback(utterance, primary).await
            }
            Err(err @ TTSError::Unauthorized(_)) => {
                error!(
                    provider = self.primary.provider_name(),
                    "TTS unauthorized: {}", err
                );
                Err(SpeechFailure::Unauthorized(err))
            }
            Err(err @ TTSError::InvalidConfiguration(_)) => {
                error!(provider = self.primary.provider_name(), "{}", err);
                Err(SpeechFailure::Misconfigured(err))
            }
            Err(err) => {
                error!(
                    provider = self.primary.provider_name(),
                    "TTS service unavailable: {}", err
                );
                Err(SpeechFailure::Unavailable(err))
            }
        }
    }

    async fn synthesize_fallback(
        &self,
        utterance: &Utterance,
        primary: TTSError,
    ) -> Result<Synthesis, SpeechFailure> {
        match self.secondary.synthesize(utterance).await {
            Ok(audio) => {
                info!(
                    provider = self.secondary.provider_name(),
                    bytes = audio.data.len(),
                    "Speech synthesized by fallback provider"
                );
                Ok(Synthesis {
                    text: utterance.text.clone(),
                    audio,
                    fallback_used: true,
                })
            }
            Err(secondary) => {
                error!(
                    provider = self.secondary.provider_name(),
                    "Fallback TTS failed: {}", secondary
                );
                Err(SpeechFailure::FallbackFailed { primary, secondary })
            }
        }
    }
}

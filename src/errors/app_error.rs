//! Error type returned by HTTP handlers.
//!
//! Every failure becomes a JSON body `{"error": "<message>"}` with the status
//! code of its class.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::core::chat::ChatError;
use crate::core::tts::{ErrorBody, SpeechFailure, UtteranceError};

pub const MISSING_API_KEY: &str = "Server misconfiguration: missing API key.";
pub const TTS_UNAUTHORIZED: &str = "TTS unauthorized—check billing & API key.";
pub const TTS_UNAVAILABLE: &str = "Text-to-speech service is unavailable.";
pub const TTS_FALLBACK_FAILED: &str = "Voice service unavailable (fallback failed).";
pub const CHAT_FAILED: &str = "Failed to process chat request";
pub const INVALID_MESSAGES: &str = "Missing or invalid `messages` parameter.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Request body failed validation (400)
    #[error("{0}")]
    InvalidInput(String),
    /// Upstream credential or billing failure (403)
    #[error("{0}")]
    Unauthorized(String),
    /// Upstream provider unreachable or failing (503)
    #[error("{0}")]
    ServiceUnavailable(String),
    /// Server is missing required configuration (500)
    #[error("{0}")]
    Misconfigured(String),
    /// Anything else (500)
    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Misconfigured(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn missing_api_key() -> Self {
        Self::Misconfigured(MISSING_API_KEY.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<UtteranceError> for AppError {
    fn from(err: UtteranceError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<SpeechFailure> for AppError {
    fn from(failure: SpeechFailure) -> Self {
        match failure {
            SpeechFailure::Unauthorized(_) => Self::Unauthorized(TTS_UNAUTHORIZED.to_string()),
            SpeechFailure::Unavailable(_) => Self::ServiceUnavailable(TTS_UNAVAILABLE.to_string()),
            SpeechFailure::FallbackFailed { .. } => {
                Self::ServiceUnavailable(TTS_FALLBACK_FAILED.to_string())
            }
            SpeechFailure::Misconfigured(_) => Self::missing_api_key(),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidConfiguration(_) => Self::missing_api_key(),
            other => {
                error!("Chat error: {}", other);
                Self::Internal(CHAT_FAILED.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tts::TTSError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::ServiceUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::missing_api_key().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_speech_failure_mapping() {
        let quota = TTSError::QuotaExceeded("429".into());
        let down = TTSError::ProviderError {
            status: 500,
            message: "down".into(),
        };

        assert_eq!(
            AppError::from(SpeechFailure::Unauthorized(TTSError::Unauthorized("401".into()))),
            AppError::Unauthorized(TTS_UNAUTHORIZED.to_string())
        );
        assert_eq!(
            AppError::from(SpeechFailure::Unavailable(down.clone())),
            AppError::ServiceUnavailable(TTS_UNAVAILABLE.to_string())
        );
        assert_eq!(
            AppError::from(SpeechFailure::FallbackFailed {
                primary: quota,
                secondary: down,
            }),
            AppError::ServiceUnavailable(TTS_FALLBACK_FAILED.to_string())
        );
    }

    #[test]
    fn test_chat_error_mapping() {
        assert_eq!(
            AppError::from(ChatError::InvalidConfiguration("no key".into())),
            AppError::missing_api_key()
        );
        assert_eq!(
            AppError::from(ChatError::UpstreamError {
                status: 502,
                message: "bad gateway".into()
            }),
            AppError::Internal(CHAT_FAILED.to_string())
        );
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::from(UtteranceError::InvalidText).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Missing or invalid `text` parameter.");
    }
}

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::core::chat::ChatCompletionClient;
use crate::core::tts::{SpeechPipeline, create_tts_provider};
use crate::errors::{AppError, AppResult};

/// Application state shared across all handlers
pub struct AppState {
    pub config: ServerConfig,
    /// Pooled HTTP client reused by every upstream provider
    pub http_client: reqwest::Client,
}

impl AppState {
    pub async fn new(config: ServerConfig) -> Arc<Self> {
        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build tuned HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });

        info!(
            tts_configured = config.tts_api_key.is_some(),
            chat_configured = config.chat_api_key.is_some(),
            "Application state initialized"
        );

        Arc::new(Self {
            config,
            http_client,
        })
    }

    /// Primary → fallback speech pipeline for one request.
    ///
    /// Fails with a misconfiguration error, without touching the network, when
    /// the primary credential is missing.
    pub fn speech_pipeline(&self) -> AppResult<SpeechPipeline> {
        let primary_config = self
            .config
            .primary_tts_config()
            .ok_or_else(AppError::missing_api_key)?;

        let primary = create_tts_provider("openai", self.http_client.clone(), primary_config)
            .map_err(|_| AppError::missing_api_key())?;
        let secondary = create_tts_provider(
            "google-translate",
            self.http_client.clone(),
            self.config.fallback_tts_config(),
        )
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(SpeechPipeline::new(primary, secondary))
    }

    /// Tutor chat client, or a misconfiguration error when the credential is missing.
    pub fn chat_client(&self) -> AppResult<ChatCompletionClient> {
        let chat_config = self
            .config
            .chat_config()
            .ok_or_else(AppError::missing_api_key)?;

        Ok(ChatCompletionClient::new(
            self.http_client.clone(),
            chat_config,
        )?)
    }
}

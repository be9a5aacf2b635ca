//! Configuration module for the Mandarin tutor gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! Provider credentials are optional at startup. A missing credential is only
//! reported when a request needs it.
//!
//! # Example
//! ```rust,no_run
//! use mandarin_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

use crate::core::chat::ChatConfig;
use crate::core::tts::TTSConfig;

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains all configuration needed to run the gateway:
/// - Server settings (host, port, TLS)
/// - Speech providers (primary OpenAI TTS, Google Translate fallback)
/// - Tutor chat provider (OpenAI-compatible completion endpoint)
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Speech synthesis
    /// Credential of the primary TTS provider (MANDARINBUILDER_API_KEY)
    pub tts_api_key: Option<String>,
    pub openai_tts_url: String,
    pub openai_tts_model: String,
    /// Unauthenticated fallback endpoint, used only on primary quota exhaustion
    pub fallback_tts_url: String,
    pub fallback_tts_language: String,
    pub tts_timeout_seconds: u64,

    // Tutor chat
    /// Credential of the chat completion provider (DEEPINFRA_API_KEY)
    pub chat_api_key: Option<String>,
    pub chat_completions_url: String,
    pub chat_model: String,
    pub chat_temperature: f32,
    pub chat_system_prompt: String,
    pub chat_timeout_seconds: u64,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

/// Zeroize provider credentials when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.tts_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.chat_api_key {
            key.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables (and defaults).
    ///
    /// The `.env` file, if any, is loaded in `main` before this is called.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Get API key for a specific provider
    ///
    /// # Returns
    /// * `Result<String, String>` - The API key on success, or an error message on failure
    pub fn get_api_key(&self, provider: &str) -> Result<String, String> {
        let key = match provider.to_lowercase().as_str() {
            "openai" | "tts" => self.tts_api_key.as_ref(),
            "deepinfra" | "chat" => self.chat_api_key.as_ref(),
            _ => return Err(format!("Unsupported provider: {provider}")),
        };

        key.filter(|k| !k.trim().is_empty())
            .cloned()
            .ok_or_else(|| format!("{provider} API key not configured in server environment"))
    }

    /// Provider configuration of the primary TTS provider.
    ///
    /// Returns `None` when the credential is missing.
    pub fn primary_tts_config(&self) -> Option<TTSConfig> {
        let api_key = self.get_api_key("openai").ok()?;
        Some(TTSConfig {
            api_key,
            endpoint: self.openai_tts_url.clone(),
            model: self.openai_tts_model.clone(),
            language: None,
            request_timeout_secs: self.tts_timeout_seconds,
        })
    }

    /// Provider configuration of the fallback TTS provider.
    pub fn fallback_tts_config(&self) -> TTSConfig {
        TTSConfig {
            api_key: String::new(),
            endpoint: self.fallback_tts_url.clone(),
            model: String::new(),
            language: Some(self.fallback_tts_language.clone()),
            request_timeout_secs: self.tts_timeout_seconds,
        }
    }

    /// Configuration of the tutor chat provider.
    ///
    /// Returns `None` when the credential is missing.
    pub fn chat_config(&self) -> Option<ChatConfig> {
        let api_key = self.get_api_key("deepinfra").ok()?;
        Some(ChatConfig {
            api_key,
            endpoint: self.chat_completions_url.clone(),
            model: self.chat_model.clone(),
            temperature: self.chat_temperature,
            system_prompt: self.chat_system_prompt.clone(),
            request_timeout_secs: self.chat_timeout_seconds,
        })
    }
}

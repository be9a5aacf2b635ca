use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ServerConfig, TlsConfig};
use crate::core::chat::{DEEPINFRA_CHAT_URL, DEFAULT_CHAT_MODEL, DEFAULT_TUTOR_PROMPT};
use crate::core::tts::{GOOGLE_TRANSLATE_TTS_URL, OPENAI_TTS_URL};

pub(super) const DEFAULT_HOST: &str = "0.0.0.0";
pub(super) const DEFAULT_PORT: u16 = 3001;
pub(super) const DEFAULT_TTS_MODEL: &str = "tts-1";
pub(super) const DEFAULT_FALLBACK_LANGUAGE: &str = "zh-CN";
pub(super) const DEFAULT_TTS_TIMEOUT_SECONDS: u64 = 10;
pub(super) const DEFAULT_CHAT_TEMPERATURE: f32 = 0.7;
pub(super) const DEFAULT_CHAT_TIMEOUT_SECONDS: u64 = 30;
pub(super) const DEFAULT_RATE_LIMIT_RPS: u32 = 60;
pub(super) const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

/// Read a variable, treating blank values as unset.
fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_var(name).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(name: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| format!("Invalid value for {name} ({raw}): {e}").into()),
        None => Ok(default),
    }
}

fn parse_bool(name: &str) -> Result<bool, Box<dyn std::error::Error>> {
    match env_var(name).map(|v| v.to_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("Invalid boolean for {name}: {v}").into()),
        },
    }
}

fn tls_from_env() -> Result<Option<TlsConfig>, Box<dyn std::error::Error>> {
    if !parse_bool("TLS_ENABLED")? {
        return Ok(None);
    }

    let cert_path = env_var("TLS_CERT_PATH")
        .ok_or("TLS_ENABLED is set but TLS_CERT_PATH is missing")?;
    let key_path =
        env_var("TLS_KEY_PATH").ok_or("TLS_ENABLED is set but TLS_KEY_PATH is missing")?;

    Ok(Some(TlsConfig {
        cert_path: PathBuf::from(cert_path),
        key_path: PathBuf::from(key_path),
    }))
}

/// Build a configuration from environment variables, falling back to defaults.
pub(super) fn load_from_env() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    Ok(ServerConfig {
        host: env_or("HOST", DEFAULT_HOST),
        port: parse_env("PORT", DEFAULT_PORT)?,
        tls: tls_from_env()?,

        tts_api_key: env_var("MANDARINBUILDER_API_KEY"),
        openai_tts_url: env_or("OPENAI_TTS_URL", OPENAI_TTS_URL),
        openai_tts_model: env_or("OPENAI_TTS_MODEL", DEFAULT_TTS_MODEL),
        fallback_tts_url: env_or("FALLBACK_TTS_URL", GOOGLE_TRANSLATE_TTS_URL),
        fallback_tts_language: env_or("FALLBACK_TTS_LANGUAGE", DEFAULT_FALLBACK_LANGUAGE),
        tts_timeout_seconds: parse_env("TTS_TIMEOUT_SECONDS", DEFAULT_TTS_TIMEOUT_SECONDS)?,

        chat_api_key: env_var("DEEPINFRA_API_KEY"),
        chat_completions_url: env_or("CHAT_COMPLETIONS_URL", DEEPINFRA_CHAT_URL),
        chat_model: env_or("CHAT_MODEL", DEFAULT_CHAT_MODEL),
        chat_temperature: parse_env("CHAT_TEMPERATURE", DEFAULT_CHAT_TEMPERATURE)?,
        chat_system_prompt: env_or("CHAT_SYSTEM_PROMPT", DEFAULT_TUTOR_PROMPT),
        chat_timeout_seconds: parse_env("CHAT_TIMEOUT_SECONDS", DEFAULT_CHAT_TIMEOUT_SECONDS)?,

        cors_allowed_origins: env_var("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second: parse_env(
            "RATE_LIMIT_REQUESTS_PER_SECOND",
            DEFAULT_RATE_LIMIT_RPS,
        )?,
        rate_limit_burst_size: parse_env("RATE_LIMIT_BURST_SIZE", DEFAULT_RATE_LIMIT_BURST)?,
    })
}

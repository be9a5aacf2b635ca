use url::Url;

use super::ServerConfig;

/// Validate a merged configuration.
///
/// Credentials are not checked here; their absence is reported per request.
pub(super) fn validate_config(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_provider_url("OPENAI_TTS_URL", &config.openai_tts_url)?;
    validate_provider_url("FALLBACK_TTS_URL", &config.fallback_tts_url)?;
    validate_provider_url("CHAT_COMPLETIONS_URL", &config.chat_completions_url)?;

    if !(0.0..=2.0).contains(&config.chat_temperature) {
        return Err(format!(
            "CHAT_TEMPERATURE must be between 0.0 and 2.0, got {}",
            config.chat_temperature
        )
        .into());
    }

    if config.tts_timeout_seconds == 0 {
        return Err("TTS_TIMEOUT_SECONDS must be greater than zero".into());
    }
    if config.chat_timeout_seconds == 0 {
        return Err("CHAT_TIMEOUT_SECONDS must be greater than zero".into());
    }

    if config.rate_limit_requests_per_second == 0 {
        return Err("RATE_LIMIT_REQUESTS_PER_SECOND must be greater than zero".into());
    }
    if config.rate_limit_burst_size == 0 {
        return Err("RATE_LIMIT_BURST_SIZE must be greater than zero".into());
    }

    if let Some(tls) = &config.tls {
        if !tls.cert_path.exists() {
            return Err(format!(
                "TLS certificate file not found: {}",
                tls.cert_path.display()
            )
            .into());
        }
        if !tls.key_path.exists() {
            return Err(format!("TLS key file not found: {}", tls.key_path.display()).into());
        }
    }

    Ok(())
}

/// Provider endpoints must be absolute http(s) URLs.
fn validate_provider_url(name: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = Url::parse(value).map_err(|e| format!("Invalid {name} ({value}): {e}"))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!("Invalid {name}: unsupported scheme '{scheme}'").into()),
    }
}

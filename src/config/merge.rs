use std::path::PathBuf;

use super::yaml::YamlConfig;
use super::{ServerConfig, TlsConfig, env};

/// Build the final configuration: environment (with defaults) first, then
/// any value present in the YAML file on top.
pub(super) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = env::load_from_env()?;

    if let Some(yaml) = yaml {
        apply_yaml(&mut config, yaml)?;
    }

    Ok(config)
}

fn apply_yaml(
    config: &mut ServerConfig,
    yaml: YamlConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(server) = yaml.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(tls) = server.tls {
            match tls.enabled {
                Some(false) => config.tls = None,
                Some(true) => {
                    let cert_path = tls
                        .cert_path
                        .ok_or("server.tls.enabled is true but cert_path is missing")?;
                    let key_path = tls
                        .key_path
                        .ok_or("server.tls.enabled is true but key_path is missing")?;
                    config.tls = Some(TlsConfig {
                        cert_path: PathBuf::from(cert_path),
                        key_path: PathBuf::from(key_path),
                    });
                }
                None => {}
            }
        }
    }

    if let Some(tts) = yaml.tts {
        if let Some(key) = tts.api_key {
            config.tts_api_key = Some(key);
        }
        if let Some(url) = tts.url {
            config.openai_tts_url = url;
        }
        if let Some(model) = tts.model {
            config.openai_tts_model = model;
        }
        if let Some(url) = tts.fallback_url {
            config.fallback_tts_url = url;
        }
        if let Some(language) = tts.fallback_language {
            config.fallback_tts_language = language;
        }
        if let Some(timeout) = tts.timeout_seconds {
            config.tts_timeout_seconds = timeout;
        }
    }

    if let Some(chat) = yaml.chat {
        if let Some(key) = chat.api_key {
            config.chat_api_key = Some(key);
        }
        if let Some(url) = chat.url {
            config.chat_completions_url = url;
        }
        if let Some(model) = chat.model {
            config.chat_model = model;
        }
        if let Some(temperature) = chat.temperature {
            config.chat_temperature = temperature;
        }
        if let Some(prompt) = chat.system_prompt {
            config.chat_system_prompt = prompt;
        }
        if let Some(timeout) = chat.timeout_seconds {
            config.chat_timeout_seconds = timeout;
        }
    }

    if let Some(security) = yaml.security {
        if let Some(origins) = security.cors_allowed_origins {
            config.cors_allowed_origins = Some(origins);
        }
        if let Some(rps) = security.rate_limit_requests_per_second {
            config.rate_limit_requests_per_second = rps;
        }
        if let Some(burst) = security.rate_limit_burst_size {
            config.rate_limit_burst_size = burst;
        }
    }

    Ok(())
}

use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in the
/// file take precedence over environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///   tls:
///     enabled: true
///     cert_path: "/etc/ssl/gateway.pem"
///     key_path: "/etc/ssl/gateway.key"
///
/// tts:
///   api_key: "sk-..."
///   url: "https://api.openai.com/v1/audio/speech"
///   model: "tts-1"
///   fallback_url: "https://translate.google.com/translate_tts"
///   fallback_language: "zh-CN"
///   timeout_seconds: 10
///
/// chat:
///   api_key: "your-deepinfra-key"
///   url: "https://api.deepinfra.com/v1/openai/chat/completions"
///   model: "mistralai/Mixtral-8x7B-Instruct-v0.1"
///   temperature: 0.7
///   system_prompt: "You are a friendly Mandarin tutor named Mei."
///   timeout_seconds: 30
///
/// security:
///   cors_allowed_origins: "https://app.example.com"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub tts: Option<TtsYaml>,
    pub chat: Option<ChatYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Speech synthesis providers from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub api_key: Option<String>,
    pub url: Option<String>,
    pub model: Option<String>,
    pub fallback_url: Option<String>,
    pub fallback_language: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Tutor chat provider from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ChatYaml {
    pub api_key: Option<String>,
    pub url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 8080
  tls:
    enabled: true
    cert_path: "/tmp/cert.pem"
    key_path: "/tmp/key.pem"

tts:
  api_key: "sk-yaml"
  model: "tts-1-hd"
  fallback_language: "zh-TW"
  timeout_seconds: 5

chat:
  api_key: "di-yaml"
  temperature: 0.3

security:
  cors_allowed_origins: "*"
  rate_limit_burst_size: 20
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(server.port, Some(8080));
        assert_eq!(server.tls.as_ref().unwrap().enabled, Some(true));

        let tts = config.tts.as_ref().unwrap();
        assert_eq!(tts.api_key.as_deref(), Some("sk-yaml"));
        assert_eq!(tts.model.as_deref(), Some("tts-1-hd"));
        assert_eq!(tts.fallback_language.as_deref(), Some("zh-TW"));
        assert_eq!(tts.timeout_seconds, Some(5));
        assert!(tts.url.is_none());

        let chat = config.chat.as_ref().unwrap();
        assert_eq!(chat.api_key.as_deref(), Some("di-yaml"));
        assert_eq!(chat.temperature, Some(0.3));

        let security = config.security.as_ref().unwrap();
        assert_eq!(security.cors_allowed_origins.as_deref(), Some("*"));
        assert_eq!(security.rate_limit_burst_size, Some(20));
        assert!(security.rate_limit_requests_per_second.is_none());
    }

    #[test]
    fn test_yaml_config_partial() {
        let config: YamlConfig = serde_yaml::from_str("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.unwrap().port, Some(9000));
        assert!(config.tts.is_none());
        assert!(config.chat.is_none());
        assert!(config.security.is_none());
    }

    #[test]
    fn test_yaml_config_empty() {
        let config: YamlConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.server.is_none());
    }

    #[test]
    fn test_yaml_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "chat:\n  model: \"custom-model\"\n").unwrap();

        let config = YamlConfig::from_file(&path).unwrap();
        assert_eq!(
            config.chat.unwrap().model.as_deref(),
            Some("custom-model")
        );
    }

    #[test]
    fn test_yaml_config_invalid_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "server:\n  port: \"not-a-number\"\n").unwrap();

        let err = YamlConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse YAML config"));
    }
}

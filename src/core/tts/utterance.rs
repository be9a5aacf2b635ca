//! Parsing and validation of incoming speech requests.

use serde_json::Value;
use thiserror::Error;

use super::openai::OpenAIVoice;

/// Validated unit of text submitted for speech synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Trimmed, non-empty text
    pub text: String,
    /// Voice preset; always one of the allow-listed voices
    pub voice: OpenAIVoice,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UtteranceError {
    #[error("Missing or invalid `text` parameter.")]
    InvalidText,
}

impl Utterance {
    /// Build an utterance from already-typed values.
    pub fn new(text: &str, voice: Option<&str>) -> Result<Self, UtteranceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(UtteranceError::InvalidText);
        }

        Ok(Self {
            text: text.to_string(),
            voice: voice
                .map(OpenAIVoice::from_str_or_default)
                .unwrap_or_default(),
        })
    }

    /// Parse a raw request body.
    ///
    /// A body that is not valid JSON is treated as an empty object. A `voice`
    /// that is not a string or not on the allow-list silently becomes the default.
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, UtteranceError> {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        Self::from_json(&value)
    }

    pub fn from_json(value: &Value) -> Result<Self, UtteranceError> {
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .ok_or(UtteranceError::InvalidText)?;
        let voice = value.get("voice").and_then(Value::as_str);

        Self::new(text, voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_is_trimmed() {
        let utterance = Utterance::new("  你好 \n", Some("nova")).unwrap();
        assert_eq!(utterance.text, "你好");
        assert_eq!(utterance.voice, OpenAIVoice::Nova);
    }

    #[test]
    fn test_blank_text_rejected() {
        assert_eq!(Utterance::new("", None), Err(UtteranceError::InvalidText));
        assert_eq!(Utterance::new("   \t", None), Err(UtteranceError::InvalidText));
    }

    #[test]
    fn test_non_string_text_rejected() {
        for body in [
            json!({"text": 42}),
            json!({"text": null}),
            json!({"text": ["你好"]}),
            json!({"voice": "nova"}),
            json!("你好"),
        ] {
            assert_eq!(
                Utterance::from_json(&body),
                Err(UtteranceError::InvalidText),
                "body {body} should be rejected"
            );
        }
    }

    #[test]
    fn test_malformed_body_is_invalid_text() {
        assert_eq!(
            Utterance::from_json_bytes(b"{not json"),
            Err(UtteranceError::InvalidText)
        );
        assert_eq!(
            Utterance::from_json_bytes(b""),
            Err(UtteranceError::InvalidText)
        );
    }

    #[test]
    fn test_unknown_voice_defaults() {
        let utterance = Utterance::from_json(&json!({"text": "谢谢", "voice": "verse"})).unwrap();
        assert_eq!(utterance.voice, OpenAIVoice::Alloy);

        let utterance = Utterance::from_json(&json!({"text": "谢谢", "voice": 7})).unwrap();
        assert_eq!(utterance.voice, OpenAIVoice::Alloy);

        let utterance = Utterance::from_json(&json!({"text": "谢谢"})).unwrap();
        assert_eq!(utterance.voice, OpenAIVoice::Alloy);
    }

    #[test]
    fn test_voice_case_insensitive() {
        let utterance = Utterance::from_json_bytes(br#"{"text":"hi","voice":"SHIMMER"}"#).unwrap();
        assert_eq!(utterance.voice, OpenAIVoice::Shimmer);
    }
}

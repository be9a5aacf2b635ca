//! Speaks tutor replies: dispatch to the gateway, then play locally.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

use super::player::{AudioPlayer, AudioSink, PlaybackOutcome};
use super::speech::SpeechClient;
use crate::core::tts::OpenAIVoice;

static LEADING_CHINESE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^(]+)").expect("leading text pattern is valid"));

/// Text before the first `(`, trimmed. Tutor replies put pinyin and the
/// English gloss in parentheses after the Chinese sentence.
pub fn extract_chinese_text(content: &str) -> String {
    LEADING_CHINESE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

pub fn toast_message(reason: impl std::fmt::Display) -> String {
    format!("Could not play audio: {reason}")
}

pub struct Tutor<S: AudioSink> {
    speech: SpeechClient,
    player: AudioPlayer<S>,
    voice: OpenAIVoice,
}

impl<S: AudioSink> Tutor<S> {
    pub fn new(speech: SpeechClient, player: AudioPlayer<S>, voice: OpenAIVoice) -> Self {
        Self {
            speech,
            player,
            voice,
        }
    }

    pub fn voice(&self) -> OpenAIVoice {
        self.voice
    }

    pub fn set_voice(&mut self, voice: OpenAIVoice) {
        self.voice = voice;
    }

    /// Speak `text`. Returns the message to show the user, if any.
    pub async fn speak(&mut self, text: &str) -> Option<String> {
        let reply = match self.speech.speak(text, Some(self.voice)).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Error playing audio: {}", e);
                return Some(toast_message(e));
            }
        };

        match self.player.play_data_url(&reply.audio_data).await {
            PlaybackOutcome::Completed => None,
            outcome => outcome.notice().map(str::to_string),
        }
    }

    /// Speak the Chinese part of a tutor reply. Replies without one are skipped.
    pub async fn speak_reply(&mut self, content: &str) -> Option<String> {
        let text = extract_chinese_text(content);
        if text.is_empty() {
            return None;
        }
        self.speak(&text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_chinese_text() {
        assert_eq!(
            extract_chinese_text("你好！(Nǐ hǎo!) Hello!"),
            "你好！"
        );
        assert_eq!(extract_chinese_text("  谢谢 (xièxie)"), "谢谢");
        assert_eq!(extract_chinese_text("没有拼音"), "没有拼音");
        assert_eq!(extract_chinese_text("(only pinyin)"), "");
        assert_eq!(extract_chinese_text(""), "");
    }

    #[test]
    fn test_toast_message() {
        assert_eq!(
            toast_message("No audio returned"),
            "Could not play audio: No audio returned"
        );
    }
}

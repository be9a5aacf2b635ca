//! Audio sinks usable outside a browser.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::player::{AudioSink, MediaErrorCode};
use crate::core::tts::AudioData;

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/ogg" | "audio/opus" => "opus",
        "audio/aac" => "aac",
        "audio/wav" | "audio/x-wav" => "wav",
        _ => "bin",
    }
}

/// Writes each loaded clip to a file. Playback completes immediately.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AudioSink for FileSink {
    async fn load(&mut self, audio: &AudioData) -> Result<(), MediaErrorCode> {
        if audio.is_empty() {
            return Err(MediaErrorCode::Decode);
        }
        tokio::fs::write(&self.path, &audio.data).await.map_err(|e| {
            warn!("Failed to write audio to {}: {}", self.path.display(), e);
            MediaErrorCode::Aborted
        })?;
        debug!(path = %self.path.display(), bytes = audio.data.len(), "Audio written");
        Ok(())
    }

    async fn play(&mut self) -> Result<(), String> {
        Ok(())
    }

    async fn ended(&mut self) -> Result<(), MediaErrorCode> {
        Ok(())
    }

    fn release(&mut self) {}
}

/// Plays clips through an external command such as `mpg123` or `afplay`.
///
/// The clip is staged in a temporary file that is passed as the last argument.
pub struct CommandSink {
    program: String,
    args: Vec<String>,
    staged: Option<PathBuf>,
    child: Option<Child>,
}

impl CommandSink {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            staged: None,
            child: None,
        }
    }

    fn clear(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
        }
        if let Some(path) = self.staged.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[async_trait]
impl AudioSink for CommandSink {
    async fn load(&mut self, audio: &AudioData) -> Result<(), MediaErrorCode> {
        self.clear();
        if audio.is_empty() {
            return Err(MediaErrorCode::Decode);
        }

        let path = std::env::temp_dir().join(format!(
            "mandarin-gateway-{}.{}",
            uuid::Uuid::new_v4(),
            extension_for(&audio.format)
        ));
        tokio::fs::write(&path, &audio.data).await.map_err(|e| {
            warn!("Failed to stage audio: {}", e);
            MediaErrorCode::Aborted
        })?;
        self.staged = Some(path);
        Ok(())
    }

    async fn play(&mut self) -> Result<(), String> {
        let path = self.staged.as_ref().ok_or("no audio loaded")?;
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("{}: {e}", self.program))?;
        self.child = Some(child);
        Ok(())
    }

    async fn ended(&mut self) -> Result<(), MediaErrorCode> {
        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };
        let status = child.wait().await.map_err(|_| MediaErrorCode::Aborted)?;
        self.child = None;
        if status.success() {
            Ok(())
        } else {
            Err(MediaErrorCode::Decode)
        }
    }

    fn release(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::player::{AudioPlayer, PlaybackOutcome};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_sink_writes_clip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reply.mp3");

        let mut player = AudioPlayer::new(FileSink::new(&path));
        let outcome = player
            .play(&AudioData::new(vec![1, 2, 3], "audio/mpeg"))
            .await;

        assert_eq!(outcome, PlaybackOutcome::Completed);
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_file_sink_rejects_empty_clip() {
        let dir = TempDir::new().unwrap();
        let mut player = AudioPlayer::new(FileSink::new(dir.path().join("empty.mp3")));
        let outcome = player.play(&AudioData::new(Vec::new(), "audio/mpeg")).await;
        assert_eq!(
            outcome,
            PlaybackOutcome::Failed("Audio decoding error.".to_string())
        );
    }

    #[tokio::test]
    async fn test_command_sink_missing_program() {
        let mut player = AudioPlayer::new(CommandSink::new(
            "definitely-not-an-audio-player",
            Vec::new(),
        ));
        let outcome = player.play(&AudioData::new(vec![1], "audio/mpeg")).await;
        match outcome {
            PlaybackOutcome::Failed(message) => {
                assert!(message.starts_with("Audio playback failed: definitely-not-an-audio-player"))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("audio/mpeg"), "mp3");
        assert_eq!(extension_for("audio/wav"), "wav");
        assert_eq!(extension_for("application/octet-stream"), "bin");
    }
}

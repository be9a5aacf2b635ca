//! Audio playback with a bounded wait and user-facing error messages.
//!
//! Playback never fails its caller: every run resolves to a [`PlaybackOutcome`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::core::tts::AudioData;

pub const DEFAULT_PLAYBACK_TIMEOUT: Duration = Duration::from_secs(8);
/// Shorter bound used by the voice tutor
pub const TUTOR_PLAYBACK_TIMEOUT: Duration = Duration::from_secs(5);

pub const PLAYBACK_TIMED_OUT: &str = "Audio playback timed out.";

/// Media error codes reported by an [`AudioSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorCode {
    Aborted,
    Network,
    Decode,
    SrcNotSupported,
    Unknown,
}

impl MediaErrorCode {
    /// Map a numeric media error code (1 through 4) to its variant.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::Aborted,
            2 => Self::Network,
            3 => Self::Decode,
            4 => Self::SrcNotSupported,
            _ => Self::Unknown,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Aborted => "Audio playback was aborted.",
            Self::Network => "Network error while loading audio.",
            Self::Decode => "Audio decoding error.",
            Self::SrcNotSupported => "Audio format not supported.",
            Self::Unknown => "Failed to load audio",
        }
    }
}

impl fmt::Display for MediaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of one playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Completed,
    TimedOut,
    Failed(String),
}

impl PlaybackOutcome {
    /// Message to show the user, if any.
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Completed => None,
            Self::TimedOut => Some(PLAYBACK_TIMED_OUT),
            Self::Failed(message) => Some(message),
        }
    }
}

/// Something that can load and play one clip at a time.
///
/// A sink is reused across clips; loading a new clip replaces the previous one.
#[async_trait]
pub trait AudioSink: Send {
    /// Load a clip and resolve once it is ready to play.
    async fn load(&mut self, audio: &AudioData) -> Result<(), MediaErrorCode>;

    /// Start playback. A rejection carries its reason.
    async fn play(&mut self) -> Result<(), String>;

    /// Resolve when playback ends.
    async fn ended(&mut self) -> Result<(), MediaErrorCode>;

    /// Free the underlying resource.
    fn release(&mut self);
}

#[async_trait]
impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    async fn load(&mut self, audio: &AudioData) -> Result<(), MediaErrorCode> {
        (**self).load(audio).await
    }

    async fn play(&mut self) -> Result<(), String> {
        (**self).play().await
    }

    async fn ended(&mut self) -> Result<(), MediaErrorCode> {
        (**self).ended().await
    }

    fn release(&mut self) {
        (**self).release()
    }
}

pub struct AudioPlayer<S: AudioSink> {
    sink: S,
    timeout: Duration,
}

impl<S: AudioSink> AudioPlayer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            timeout: DEFAULT_PLAYBACK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Decode a data URL and play it. A malformed URL counts as an unsupported format.
    pub async fn play_data_url(&mut self, data_url: &str) -> PlaybackOutcome {
        match AudioData::from_data_url(data_url) {
            Ok(audio) => self.play(&audio).await,
            Err(e) => {
                error!("Rejecting audio payload: {}", e);
                PlaybackOutcome::Failed(MediaErrorCode::SrcNotSupported.to_string())
            }
        }
    }

    pub async fn play(&mut self, audio: &AudioData) -> PlaybackOutcome {
        let sink = &mut self.sink;
        let run = async {
            sink.load(audio).await.map_err(|code| code.to_string())?;
            sink.play()
                .await
                .map_err(|reason| format!("Audio playback failed: {reason}"))?;
            sink.ended().await.map_err(|code| code.to_string())
        };

        match tokio::time::timeout(self.timeout, run).await {
            Ok(Ok(())) => {
                debug!(bytes = audio.data.len(), "Playback completed");
                PlaybackOutcome::Completed
            }
            Ok(Err(message)) => {
                error!("Audio playback error: {}", message);
                PlaybackOutcome::Failed(message)
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "Audio timed out");
                PlaybackOutcome::TimedOut
            }
        }
    }
}

impl<S: AudioSink> Drop for AudioPlayer<S> {
    fn drop(&mut self) {
        self.sink.release();
    }
}

//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `chat` - Streaming tutor chat proxy
//! - `tts` - Text-to-speech proxy with provider fallback
//! - `voices` - Voice preset listing

pub mod api;
pub mod chat;
pub mod tts;
pub mod voices;

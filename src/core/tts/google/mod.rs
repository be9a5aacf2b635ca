//! Google Translate TTS provider module.
//!
//! The secondary, unauthenticated provider. It speaks with a single voice per
//! language and is only reached when the primary provider reports quota
//! exhaustion.

mod provider;

pub use provider::{GOOGLE_TRANSLATE_TTS_URL, GoogleTranslateTTS};

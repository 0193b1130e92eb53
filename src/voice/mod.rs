//! Voice processing module
//!
//! Speech synthesis and audio playback. Speech-to-text is intentionally
//! absent; text input is the authoritative interface.

pub mod playback;
pub mod tts;

use chrono::{DateTime, Local};

pub use playback::{AudioPlayback, PlayAudio, PlaybackSettings, PlaybackStrategy};
pub use tts::{SpeechSynthesizer, SynthesizeSpeech, VoiceProfile};

/// A transient synthesized-audio payload (MP3 bytes)
///
/// Exists for the duration of one playback cycle. The creation timestamp
/// derives a unique temporary file name, so regenerating the same text a
/// second later never collides with an earlier artifact.
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    /// Encoded audio (MP3)
    pub bytes: Vec<u8>,

    /// When synthesis produced this artifact
    pub created_at: DateTime<Local>,
}

impl AudioArtifact {
    /// Create an artifact stamped with the current local time
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            created_at: Local::now(),
        }
    }

    /// Temporary file name for this artifact, unique at second resolution
    #[must_use]
    pub fn temp_file_name(&self) -> String {
        format!("speech_{}.mp3", self.created_at.format("%Y%m%d_%H%M%S"))
    }
}

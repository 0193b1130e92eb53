//! Session state: the append-only turn log plus the user's active settings
//!
//! Created at session start, dropped at process exit. Nothing here is
//! persisted.

use crate::voice::{PlaybackSettings, VoiceProfile};

/// Who produced a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The human user
    User,
    /// The generated assistant reply
    Assistant,
}

/// One logged exchange unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    /// Author of the turn
    pub role: Role,
    /// Turn text
    pub content: String,
}

/// Per-session state owned by the orchestrator
#[derive(Debug, Default)]
pub struct Session {
    turns: Vec<Turn>,
    voice: VoiceProfile,
    settings: PlaybackSettings,
}

impl Session {
    /// Create a fresh session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::User,
            content: content.into(),
        });
    }

    /// Append an assistant turn
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    /// The turn log, oldest first
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Active voice identity
    #[must_use]
    pub fn voice(&self) -> VoiceProfile {
        self.voice
    }

    /// Select the voice used for subsequent replies
    pub fn set_voice(&mut self, voice: VoiceProfile) {
        self.voice = voice;
    }

    /// Active playback settings
    #[must_use]
    pub fn settings(&self) -> PlaybackSettings {
        self.settings
    }

    /// Set the playback volume (clamped to 100)
    pub fn set_volume(&mut self, volume: u8) {
        self.settings.volume = volume.min(100);
    }
}

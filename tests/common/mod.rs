//! Shared test doubles for the pipeline stages
//!
//! The fakes record every call so tests can assert on stage ordering and
//! call counts without audio hardware or network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use carevoice::voice::{AudioArtifact, PlayAudio, PlaybackSettings, SynthesizeSpeech, VoiceProfile};
use carevoice::{Error, GenerateReply, NotifyContact, Result};

/// Generator that replies with a fixed string, or fails when `reply` is None
pub struct ScriptedGenerator {
    reply: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl GenerateReply for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| Error::Completion("simulated timeout".to_string()))
    }
}

/// Synthesizer that records every request and returns a tiny artifact
pub struct ScriptedSynthesizer {
    fail: bool,
    pub requests: Arc<Mutex<Vec<(String, VoiceProfile)>>>,
}

impl ScriptedSynthesizer {
    pub fn working() -> Self {
        Self {
            fail: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SynthesizeSpeech for ScriptedSynthesizer {
    async fn synthesize(&self, text: &str, voice: VoiceProfile) -> Result<AudioArtifact> {
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), voice));
        if self.fail {
            return Err(Error::Tts("simulated synthesis failure".to_string()));
        }
        Ok(AudioArtifact::new(vec![0u8; 16]))
    }
}

/// Notifier that counts outbound messages
pub struct RecordingNotifier {
    fail: bool,
    pub sent: Arc<AtomicUsize>,
}

impl RecordingNotifier {
    pub fn working() -> Self {
        Self {
            fail: false,
            sent: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl NotifyContact for RecordingNotifier {
    async fn send_alert(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Alert("401 Unauthorized".to_string()));
        }
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Playback that records cycles instead of touching a device
pub struct RecordingPlayback {
    fail: bool,
    pub cycles: Arc<Mutex<Vec<PlaybackSettings>>>,
}

impl RecordingPlayback {
    pub fn working() -> Self {
        Self {
            fail: false,
            cycles: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            cycles: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl PlayAudio for RecordingPlayback {
    async fn play(&mut self, _artifact: &AudioArtifact, settings: PlaybackSettings) -> Result<()> {
        if self.fail {
            return Err(Error::Audio("no output device available".to_string()));
        }
        self.cycles.lock().unwrap().push(settings);
        Ok(())
    }
}

//! Carevoice - voice assistant pipeline with emergency alerting
//!
//! This library provides the core pipeline for a single-operator care
//! assistant:
//! - Reply generation (chat completions)
//! - Speech synthesis (TTS) and audio playback
//! - Emergency alert delivery to a fixed contact
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            Presentation shell               │
//! │   prompt  │  voice/volume  │  alert button  │
//! └───────────────────┬─────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────┐
//! │           Assistant orchestrator            │
//! │   turn log  │  stage sequencing  │  status  │
//! └───────────────────┬─────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────┐
//! │  Completion  │  TTS  │  Playback  │  Alert  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! One turn runs at a time: trigger → text → audio artifact → playback.
//! Stage failures surface as user-visible status, never as a crash; the
//! orchestrator always returns to idle.

pub mod alert;
pub mod assistant;
pub mod completion;
pub mod config;
pub mod error;
pub mod session;
pub mod voice;

pub use alert::{AlertNotifier, NotifyContact};
pub use assistant::{ALERT_CONFIRMATION, Assistant, TurnStatus};
pub use completion::{CompletionClient, GenerateReply};
pub use config::Config;
pub use error::{Error, Result};
pub use session::{Role, Session, Turn};
pub use voice::{
    AudioArtifact, AudioPlayback, PlayAudio, PlaybackSettings, PlaybackStrategy, SpeechSynthesizer,
    SynthesizeSpeech, VoiceProfile,
};

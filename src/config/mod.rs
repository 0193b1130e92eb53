//! Configuration management for the carevoice pipeline
//!
//! Secrets come from the environment; tunables come from an optional TOML
//! overlay. Missing required secrets fail startup with a clear diagnostic.

pub mod file;

use std::path::PathBuf;

use secrecy::SecretString;

use crate::voice::playback::PlaybackStrategy;
use crate::voice::tts::VoiceProfile;
use crate::{Error, Result};

/// Default Telegram chat that receives emergency alerts when
/// `TELEGRAM_CHAT_ID` is unset.
const DEFAULT_ALERT_CHAT_ID: &str = "5767743818";

/// Carevoice configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM model identifier for chat completions
    pub llm_model: String,

    /// Cache generated replies per prompt (one hour TTL)
    pub cache_replies: bool,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys and tokens
    pub api_keys: ApiKeys,

    /// Telegram chat that receives emergency alerts
    pub alert_chat_id: String,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// Default voice identity
    pub voice: VoiceProfile,

    /// Playback strategy for synthesized audio
    pub playback: PlaybackStrategy,

    /// Default playback volume (0-100)
    pub volume: u8,

    /// Directory for transient audio files
    pub temp_dir: PathBuf,
}

/// Secrets for external services
#[derive(Clone)]
pub struct ApiKeys {
    /// `OpenAI` API key (chat completions and TTS)
    pub openai: SecretString,

    /// Telegram bot token (emergency alerts)
    pub telegram: SecretString,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("openai", &"[redacted]")
            .field("telegram", &"[redacted]")
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment plus the optional TOML file
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a required secret is missing or a
    /// config value is out of range.
    pub fn load() -> Result<Self> {
        let file = file::load_config_file();

        let openai = required_secret("OPENAI_API_KEY")?;
        let telegram = required_secret("TELEGRAM_TOKEN")?;

        let alert_chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .ok()
            .or(file.alert.chat_id)
            .unwrap_or_else(|| DEFAULT_ALERT_CHAT_ID.to_string());

        let llm_model = std::env::var("CAREVOICE_LLM_MODEL")
            .ok()
            .or(file.llm.model)
            .unwrap_or_else(|| "gpt-4o-mini".to_string());

        let playback = match std::env::var("CAREVOICE_PLAYBACK")
            .ok()
            .or(file.voice.playback)
        {
            Some(mode) => mode.parse()?,
            None => PlaybackStrategy::LocalDevice,
        };

        let volume = file.voice.volume.unwrap_or(50);
        if volume > 100 {
            return Err(Error::Config(format!(
                "voice.volume must be 0-100, got {volume}"
            )));
        }

        let voice = file
            .voice
            .voice
            .as_deref()
            .map_or(VoiceProfile::Female, VoiceProfile::from_label);

        let temp_dir = file
            .voice
            .temp_dir
            .map_or_else(|| PathBuf::from("temp_audio"), PathBuf::from);

        Ok(Self {
            llm_model,
            cache_replies: file.llm.cache_replies.unwrap_or(false),
            voice: VoiceConfig {
                tts_model: file.voice.tts_model.unwrap_or_else(|| "tts-1".to_string()),
                voice,
                playback,
                volume,
                temp_dir,
            },
            api_keys: ApiKeys { openai, telegram },
            alert_chat_id,
        })
    }
}

/// Read a required secret from the environment
fn required_secret(name: &str) -> Result<SecretString> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(Error::Config(format!(
            "{name} is not set; export it before starting carevoice"
        ))),
    }
}

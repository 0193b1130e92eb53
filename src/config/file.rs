//! TOML configuration file loading
//!
//! Supports `~/.config/carevoice/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of
//! defaults; secrets still come from the environment.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct CarevoiceConfigFile {
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Emergency alert configuration
    #[serde(default)]
    pub alert: AlertFileConfig,
}

/// LLM-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "gpt-4o-mini")
    pub model: Option<String>,

    /// Cache generated replies per prompt
    pub cache_replies: Option<bool>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// Default voice identity ("female" or "male")
    pub voice: Option<String>,

    /// Playback strategy ("local", "remote", "disabled")
    pub playback: Option<String>,

    /// Default playback volume (0-100)
    pub volume: Option<u8>,

    /// Directory for transient audio files
    pub temp_dir: Option<String>,
}

/// Emergency alert configuration
#[derive(Debug, Default, Deserialize)]
pub struct AlertFileConfig {
    /// Telegram chat id to notify
    pub chat_id: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `CarevoiceConfigFile::default()` if the file doesn't exist or
/// can't be parsed.
pub fn load_config_file() -> CarevoiceConfigFile {
    let Some(path) = config_file_path() else {
        return CarevoiceConfigFile::default();
    };

    if !path.exists() {
        return CarevoiceConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                CarevoiceConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            CarevoiceConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/carevoice/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("carevoice").join("config.toml"))
}

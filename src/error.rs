//! Error types for the carevoice pipeline

use thiserror::Error;

/// Result type alias for carevoice operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the carevoice pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing secret, bad value)
    #[error("configuration error: {0}")]
    Config(String),

    /// Completion service error (unreachable, rejected, malformed reply)
    #[error("completion error: {0}")]
    Completion(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Audio device or playback error
    #[error("audio error: {0}")]
    Audio(String),

    /// Emergency alert delivery error
    #[error("alert error: {0}")]
    Alert(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

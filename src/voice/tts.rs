//! Text-to-speech synthesis
//!
//! Converts reply text into an [`AudioArtifact`] via the `OpenAI` speech
//! API. Exactly two voice identities are exposed to the user; anything else
//! falls back to the default.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::AudioArtifact;
use crate::{Error, Result};

/// Voice identity exposed to the user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceProfile {
    /// Female voice, mapped to the provider voice "shimmer"
    #[default]
    Female,
    /// Male voice, mapped to the provider voice "onyx"
    Male,
}

impl VoiceProfile {
    /// Provider-specific voice name
    #[must_use]
    pub const fn provider_voice(self) -> &'static str {
        match self {
            Self::Female => "shimmer",
            Self::Male => "onyx",
        }
    }

    /// Label shown in the UI
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Female => "여성 (shimmer)",
            Self::Male => "남성 (onyx)",
        }
    }

    /// Parse a user-supplied label, falling back to the default voice
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        if normalized == "male" || normalized == "onyx" || normalized.contains("남성") {
            Self::Male
        } else {
            Self::Female
        }
    }
}

/// Produces an audio artifact for reply text
#[async_trait]
pub trait SynthesizeSpeech: Send + Sync {
    /// Synthesize `text` with the given voice
    ///
    /// # Errors
    ///
    /// Returns error if the text is empty or the synthesis service fails.
    async fn synthesize(&self, text: &str, voice: VoiceProfile) -> Result<AudioArtifact>;
}

/// Speech synthesizer backed by the `OpenAI` TTS API
pub struct SpeechSynthesizer {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl SpeechSynthesizer {
    /// Create a new synthesizer
    #[must_use]
    pub fn new(api_key: SecretString, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl SynthesizeSpeech for SpeechSynthesizer {
    async fn synthesize(&self, text: &str, voice: VoiceProfile) -> Result<AudioArtifact> {
        if text.trim().is_empty() {
            return Err(Error::Tts("nothing to synthesize".to_string()));
        }

        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: voice.provider_voice(),
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Tts(format!("speech synthesis failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("TTS API error {status}: {body}")));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::Tts(format!("speech synthesis failed: {e}")))?;

        tracing::debug!(
            bytes = audio.len(),
            voice = voice.provider_voice(),
            "speech synthesized"
        );

        Ok(AudioArtifact::new(audio.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_mapping_is_fixed() {
        assert_eq!(VoiceProfile::Female.provider_voice(), "shimmer");
        assert_eq!(VoiceProfile::Male.provider_voice(), "onyx");
    }

    #[test]
    fn unknown_labels_fall_back_to_default() {
        assert_eq!(VoiceProfile::from_label("male"), VoiceProfile::Male);
        assert_eq!(VoiceProfile::from_label("남성 (onyx)"), VoiceProfile::Male);
        assert_eq!(VoiceProfile::from_label("female"), VoiceProfile::Female);
        assert_eq!(VoiceProfile::from_label("robot"), VoiceProfile::Female);
        assert_eq!(VoiceProfile::from_label(""), VoiceProfile::Female);
    }
}

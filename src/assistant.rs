//! Assistant orchestrator
//!
//! Drives one turn at a time through the pipeline stages: generate reply,
//! synthesize speech, play audio. An alert turn instead delivers the
//! emergency message and speaks a confirmation. Every turn ends back in
//! the idle state; no stage failure is fatal to the session.

use crate::alert::NotifyContact;
use crate::completion::GenerateReply;
use crate::session::Session;
use crate::voice::{PlayAudio, SynthesizeSpeech, VoiceProfile};

/// Confirmation phrase spoken after a successful alert
pub const ALERT_CONFIRMATION: &str = "긴급 알림이 전송되었습니다. 곧 도움이 도착할 예정입니다.";

/// Outcome of one turn, rendered by the presentation shell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    /// Reply generated, synthesized, and played
    Replied,
    /// Prompt was empty or whitespace; nothing was logged
    EmptyPrompt,
    /// The completion service failed; no assistant turn was logged
    GenerationFailed,
    /// Reply text was logged but could not be synthesized
    SynthesisFailed,
    /// Reply was synthesized but the device could not play it
    PlaybackFailed,
    /// Alert delivered; `confirmation_spoken` is false when the spoken
    /// confirmation could not be produced
    AlertSent {
        /// Whether the confirmation phrase was rendered as audio
        confirmation_spoken: bool,
    },
    /// The messaging service failed; no confirmation was attempted
    AlertFailed,
}

impl TurnStatus {
    /// User-facing status message, `None` when nothing needs reporting
    #[must_use]
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Replied => None,
            Self::EmptyPrompt => Some("무엇을 도와드릴까요?"),
            Self::GenerationFailed => Some("응답 생성에 실패했습니다. 다시 시도해 주세요."),
            Self::SynthesisFailed => Some("음성 변환에 실패했습니다. 답변은 화면에 표시됩니다."),
            Self::PlaybackFailed => Some("음성 재생에 실패했습니다. 답변은 화면에 표시됩니다."),
            Self::AlertSent { .. } => Some("긴급 알림이 전송되었습니다!"),
            Self::AlertFailed => Some("긴급 알림 전송에 실패했습니다."),
        }
    }
}

/// Which audio stage of a turn failed
enum SpeakFailure {
    Synthesis,
    Playback,
}

/// Top-level controller for one interactive session
pub struct Assistant<G, S, N, P> {
    generator: G,
    synthesizer: S,
    notifier: N,
    playback: P,
    session: Session,
}

impl<G, S, N, P> Assistant<G, S, N, P>
where
    G: GenerateReply,
    S: SynthesizeSpeech,
    N: NotifyContact,
    P: PlayAudio,
{
    /// Create an assistant with a fresh session
    pub fn new(generator: G, synthesizer: S, notifier: N, playback: P) -> Self {
        Self {
            generator,
            synthesizer,
            notifier,
            playback,
            session: Session::new(),
        }
    }

    /// The session state (turn log, voice, volume)
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Select the voice used for subsequent replies
    pub fn set_voice(&mut self, voice: VoiceProfile) {
        self.session.set_voice(voice);
    }

    /// Set the playback volume
    pub fn set_volume(&mut self, volume: u8) {
        self.session.set_volume(volume);
    }

    /// Run one normal turn: prompt → reply → speech → playback
    ///
    /// The user turn is logged before generation starts; the assistant turn
    /// is logged only on generation success and is kept even when audio
    /// later fails.
    pub async fn handle_prompt(&mut self, prompt: &str) -> TurnStatus {
        if prompt.trim().is_empty() {
            return TurnStatus::EmptyPrompt;
        }

        self.session.push_user(prompt);

        let reply = match self.generator.generate(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "reply generation failed");
                return TurnStatus::GenerationFailed;
            }
        };

        self.session.push_assistant(reply.clone());

        match self.speak(&reply).await {
            Ok(()) => TurnStatus::Replied,
            Err(SpeakFailure::Synthesis) => TurnStatus::SynthesisFailed,
            Err(SpeakFailure::Playback) => TurnStatus::PlaybackFailed,
        }
    }

    /// Run one alert turn: deliver the emergency message, then speak a
    /// confirmation
    ///
    /// No confirmation is attempted when delivery fails; a failed
    /// confirmation does not undo a delivered alert.
    pub async fn handle_alert(&mut self) -> TurnStatus {
        if let Err(e) = self.notifier.send_alert().await {
            tracing::warn!(error = %e, "alert delivery failed");
            return TurnStatus::AlertFailed;
        }

        let confirmation_spoken = self.speak(ALERT_CONFIRMATION).await.is_ok();
        TurnStatus::AlertSent {
            confirmation_spoken,
        }
    }

    /// Synthesize and play `text`
    async fn speak(&mut self, text: &str) -> std::result::Result<(), SpeakFailure> {
        let artifact = match self
            .synthesizer
            .synthesize(text, self.session.voice())
            .await
        {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed");
                return Err(SpeakFailure::Synthesis);
            }
        };

        let settings = self.session.settings();
        match self.playback.play(&artifact, settings).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "audio playback failed");
                Err(SpeakFailure::Playback)
            }
        }
    }
}

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use crate::{
    foundation::error::VizResult,
    narration::{
        headless::{PacedPlayer, TranscriptSynthesizer},
        sanitize::SpeechSanitizer,
        speech::{SpeechProfile, SpeechSynthesizer, Utterance},
        voice::{AudioPlayer, VoiceService},
    },
};

/// How a call to [`NarrationCoordinator::speak`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// The text was read out to the end (by the voice service or the local fallback).
    Completed,
    /// `stop_all` ran while the text was queued or playing.
    Cancelled,
    /// Nothing to say.
    Skipped,
}

/// Serializes narration so at most one utterance plays at a time.
///
/// Every [`stop_all`](Self::stop_all) bumps a generation counter. A `speak` call remembers the
/// generation it started in and gives up as soon as that changes, whether it is still waiting
/// for its turn or already playing.
pub struct NarrationCoordinator {
    voice: Option<Arc<dyn VoiceService>>,
    player: Arc<dyn AudioPlayer>,
    synth: Arc<dyn SpeechSynthesizer>,
    profile: SpeechProfile,
    sanitizer: SpeechSanitizer,
    generation: watch::Sender<u64>,
    turn: Mutex<()>,
}

impl std::fmt::Debug for NarrationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrationCoordinator")
            .field("voice", &self.voice.is_some())
            .field("profile", &self.profile)
            .field("generation", &*self.generation.borrow())
            .finish_non_exhaustive()
    }
}

impl NarrationCoordinator {
    /// Coordinator with no voice service: everything goes to `synth`.
    pub fn new(
        player: Arc<dyn AudioPlayer>,
        synth: Arc<dyn SpeechSynthesizer>,
    ) -> VizResult<Self> {
        Ok(Self {
            voice: None,
            player,
            synth,
            profile: SpeechProfile::default(),
            sanitizer: SpeechSanitizer::new()?,
            generation: watch::Sender::new(0),
            turn: Mutex::new(()),
        })
    }

    /// Headless coordinator: paced player, transcript synthesizer, no voice service.
    pub fn headless() -> VizResult<Self> {
        Self::new(
            Arc::new(PacedPlayer::default()),
            Arc::new(TranscriptSynthesizer::new()),
        )
    }

    pub fn with_voice(mut self, voice: Arc<dyn VoiceService>) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn with_profile(mut self, profile: SpeechProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> &SpeechProfile {
        &self.profile
    }

    /// Speak `text` and wait until it has been read out or cancelled.
    #[tracing::instrument(level = "debug", skip_all, fields(chars = text.len()))]
    pub async fn speak(&self, text: &str) -> SpeechOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SpeechOutcome::Skipped;
        }

        let mut rx = self.generation.subscribe();
        let started = *rx.borrow_and_update();

        let _turn = tokio::select! {
            guard = self.turn.lock() => guard,
            _ = rx.wait_for(|g| *g != started) => return SpeechOutcome::Cancelled,
        };
        if *rx.borrow() != started {
            return SpeechOutcome::Cancelled;
        }

        tokio::select! {
            () = self.deliver(text) => SpeechOutcome::Completed,
            _ = rx.wait_for(|g| *g != started) => {
                tracing::debug!("narration interrupted");
                SpeechOutcome::Cancelled
            }
        }
    }

    /// Halt whatever is playing and cancel every pending `speak`.
    pub fn stop_all(&self) {
        self.generation.send_modify(|g| *g += 1);
        self.player.stop();
        self.synth.cancel();
    }

    async fn deliver(&self, text: &str) {
        if let Some(voice) = &self.voice {
            match voice.synthesize(text).await {
                Ok(audio) => match self.player.play(audio).await {
                    Ok(()) => return,
                    Err(error) => tracing::warn!(%error, "audio playback failed, using local speech"),
                },
                Err(error) => tracing::warn!(%error, "voice service failed, using local speech"),
            }
        }

        let utterance = Utterance::new(self.sanitizer.clean(text), &self.profile);
        if let Err(error) = self.synth.speak(&utterance).await {
            tracing::warn!(%error, "local speech failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/coordinator.rs"]
mod tests;

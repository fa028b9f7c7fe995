use std::{
    cell::{Ref, RefCell},
    sync::Arc,
};

use serde_json::Value;
use tokio::sync::watch;

use crate::{
    channel::protocol::ServerMessage,
    command::interpreter::{Interpreter, StepReport},
    config::EngineConfig,
    foundation::{core::Speed, error::VizResult},
    narration::{coordinator::NarrationCoordinator, voice::HttpVoiceService},
    playback::controller::{PlaybackController, PlaybackSnapshot, PlaybackStatus},
    render::backend::RenderBackend,
    scene::store::SceneStore,
    session::payload::{SessionInfo, VisualizationPayload},
};

/// Owns one visualization at a time and exposes the playback surface.
///
/// Store, renderer, interpreter and narration are created here and handed down; nothing is
/// global. Loading a new payload silences narration before anything else happens.
pub struct VisualizationSession {
    playback: PlaybackController,
    info: RefCell<SessionInfo>,
}

impl std::fmt::Debug for VisualizationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualizationSession")
            .field("info", &*self.info.borrow())
            .field("playback", &self.playback)
            .finish()
    }
}

impl VisualizationSession {
    pub fn new(backend: impl RenderBackend + 'static, narration: NarrationCoordinator) -> Self {
        Self {
            playback: PlaybackController::new(Interpreter::new(backend), narration),
            info: RefCell::new(SessionInfo::default()),
        }
    }

    /// Session wired from configuration: HTTP voice service when enabled, headless output.
    pub fn from_config(
        config: &EngineConfig,
        backend: impl RenderBackend + 'static,
    ) -> VizResult<Self> {
        let mut narration =
            NarrationCoordinator::headless()?.with_profile(config.voice.fallback.clone());
        if config.voice.enabled {
            let voice = HttpVoiceService::new(
                config.api_url()?.as_str(),
                config.voice.voice_id.clone(),
                config.voice_timeout(),
            )?;
            narration = narration.with_voice(Arc::new(voice));
        }
        let session = Self::new(backend, narration);
        session.playback.set_speed(config.playback.speed);
        Ok(session)
    }

    /// Replace the current visualization. Ends idle at step 0 with the initial state drawn.
    #[tracing::instrument(level = "info", skip_all, fields(steps = payload.steps.len()))]
    pub async fn load(&self, payload: VisualizationPayload) -> StepReport {
        self.playback.narration().stop_all();
        let (info, timeline) = payload.into_parts();
        tracing::info!(title = %info.title, "loading visualization");
        self.info.replace(info);
        self.playback.load(timeline).await
    }

    pub async fn load_json(&self, src: &str) -> VizResult<StepReport> {
        let payload = VisualizationPayload::from_json(src)?;
        Ok(self.load(payload).await)
    }

    pub async fn load_value(&self, value: Value) -> VizResult<StepReport> {
        let payload = VisualizationPayload::from_value(value)?;
        Ok(self.load(payload).await)
    }

    /// React to a backend message. Returns the setup report when a payload was loaded.
    pub async fn handle_message(&self, msg: ServerMessage) -> VizResult<Option<StepReport>> {
        match msg {
            ServerMessage::VisualizationResponse { data } => self.load_value(data).await.map(Some),
            ServerMessage::LlmMessage { text } => {
                tracing::info!(%text, "tutor");
                Ok(None)
            }
            ServerMessage::Status { message } => {
                tracing::info!(%message, "backend status");
                Ok(None)
            }
            ServerMessage::Error { message } => {
                tracing::warn!(%message, "backend error");
                Ok(None)
            }
            ServerMessage::ContextSync { files, .. } => {
                tracing::debug!(files = files.len(), "context sync");
                Ok(None)
            }
            ServerMessage::ContextUpdate { filename, .. } => {
                tracing::debug!(%filename, "context update");
                Ok(None)
            }
        }
    }

    pub fn info(&self) -> SessionInfo {
        self.info.borrow().clone()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Scene store of the current visualization. Do not hold across an await.
    pub fn store(&self) -> Ref<'_, SceneStore> {
        self.playback.interpreter().store()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.playback.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.playback.subscribe()
    }

    pub async fn play(&self) -> StepReport {
        self.playback.play().await
    }

    pub fn pause(&self) {
        self.playback.pause();
    }

    pub async fn step_forward(&self) -> Option<StepReport> {
        self.playback.step_forward().await
    }

    pub async fn step_backward(&self) -> Option<StepReport> {
        self.playback.step_backward().await
    }

    pub async fn restart(&self) -> StepReport {
        self.playback.restart().await
    }

    pub fn set_speed(&self, multiplier: f64) -> VizResult<Speed> {
        self.playback.set_speed_multiplier(multiplier)
    }

    pub fn cycle_speed(&self) -> Speed {
        self.playback.cycle_speed()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;

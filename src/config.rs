use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    channel::client::ReconnectPolicy,
    foundation::{
        core::Speed,
        error::{VizError, VizResult},
    },
    narration::speech::SpeechProfile,
};

pub const ENV_API_BASE: &str = "ALGOSCOPE_API_BASE";
pub const ENV_WS_URL: &str = "ALGOSCOPE_WS_URL";
pub const ENV_VOICE_ID: &str = "ALGOSCOPE_VOICE_ID";

/// Engine configuration, usually read from `algoscope.toml`.
///
/// Every field has a default, so an empty file is valid. Environment variables override the
/// file (see [`EngineConfig::apply_env`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Base URL of the backend serving `/tts` and `/ws`.
    pub api_base: String,
    pub voice: VoiceConfig,
    pub channel: ChannelConfig,
    pub playback: PlaybackConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoiceConfig {
    /// Use the remote voice service; when false everything is spoken locally.
    pub enabled: bool,
    pub voice_id: Option<String>,
    pub timeout_ms: u64,
    /// Local synthesizer settings.
    pub fallback: SpeechProfile,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    /// Derived from `api_base` when absent.
    pub ws_url: Option<String>,
    pub max_reconnect_attempts: u32,
    pub reconnect_base_delay_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    pub speed: Speed,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_owned(),
            voice: VoiceConfig::default(),
            channel: ChannelConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            voice_id: None,
            timeout_ms: 10_000,
            fallback: SpeechProfile::default(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        let policy = ReconnectPolicy::default();
        Self {
            ws_url: None,
            max_reconnect_attempts: policy.max_attempts,
            reconnect_base_delay_ms: policy.base_delay.as_millis() as u64,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: Speed::NORMAL,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(src: &str) -> VizResult<Self> {
        let config: Self =
            toml::from_str(src).map_err(|e| VizError::serde(format!("config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> VizResult<Self> {
        let src = std::fs::read_to_string(path).map_err(|e| {
            VizError::validation(format!("failed to read config {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml_str(&src)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for runs without a config file.
    pub fn from_env() -> VizResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `ALGOSCOPE_*` overrides looked up through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> VizResult<()> {
        if let Some(v) = var(ENV_API_BASE) {
            self.api_base = v;
        }
        if let Some(v) = var(ENV_WS_URL) {
            self.channel.ws_url = Some(v);
        }
        if let Some(v) = var(ENV_VOICE_ID) {
            self.voice.voice_id = Some(v).filter(|s| !s.trim().is_empty());
        }
        self.validate()
    }

    pub fn validate(&self) -> VizResult<()> {
        self.api_url()?;
        self.ws_url()?;
        if self.voice.timeout_ms == 0 {
            return Err(VizError::validation("voice.timeout_ms must be positive"));
        }
        if self.voice.fallback.rate <= 0.0 || !self.voice.fallback.rate.is_finite() {
            return Err(VizError::validation("voice.fallback.rate must be positive"));
        }
        Ok(())
    }

    pub fn api_url(&self) -> VizResult<Url> {
        let url = Url::parse(&self.api_base)
            .map_err(|e| VizError::validation(format!("api_base {:?}: {e}", self.api_base)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(VizError::validation(format!(
                "api_base must be http or https, got {other}"
            ))),
        }
    }

    /// WebSocket endpoint: `channel.ws_url`, or `api_base` with a ws scheme and `/ws` path.
    pub fn ws_url(&self) -> VizResult<Url> {
        if let Some(raw) = &self.channel.ws_url {
            let url = Url::parse(raw)
                .map_err(|e| VizError::validation(format!("channel.ws_url {raw:?}: {e}")))?;
            return match url.scheme() {
                "ws" | "wss" => Ok(url),
                other => Err(VizError::validation(format!(
                    "channel.ws_url must be ws or wss, got {other}"
                ))),
            };
        }

        let mut url = self.api_url()?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|()| VizError::validation("api_base cannot be turned into a ws url"))?;
        url.set_path("/ws");
        url.set_query(None);
        Ok(url)
    }

    pub fn voice_timeout(&self) -> Duration {
        Duration::from_millis(self.voice.timeout_ms)
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: self.channel.max_reconnect_attempts,
            base_delay: Duration::from_millis(self.channel.reconnect_base_delay_ms),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::foundation::error::{VizError, VizResult};

/// Remote text-to-speech returning encoded audio.
#[async_trait]
pub trait VoiceService: Send + Sync {
    async fn synthesize(&self, text: &str) -> VizResult<Vec<u8>>;
}

/// Plays encoded audio to completion.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, audio: Vec<u8>) -> VizResult<()>;

    /// Halt playback immediately.
    fn stop(&self);
}

/// Voice service reached over HTTP: `POST {api_base}/tts` with `{ "text", "voice_id" }`.
#[derive(Clone, Debug)]
pub struct HttpVoiceService {
    client: reqwest::Client,
    endpoint: String,
    voice_id: Option<String>,
}

impl HttpVoiceService {
    pub fn new(api_base: &str, voice_id: Option<String>, timeout: Duration) -> VizResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VizError::narration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}/tts", api_base.trim_end_matches('/')),
            voice_id,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl VoiceService for HttpVoiceService {
    #[tracing::instrument(level = "debug", skip_all, fields(chars = text.len()))]
    async fn synthesize(&self, text: &str) -> VizResult<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "text": text, "voice_id": self.voice_id }))
            .send()
            .await
            .map_err(|e| VizError::narration(format!("voice service unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VizError::narration(format!(
                "voice service returned {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VizError::narration(format!("failed to read audio: {e}")))?;
        if bytes.is_empty() {
            return Err(VizError::narration("voice service returned no audio"));
        }
        Ok(bytes.to_vec())
    }
}

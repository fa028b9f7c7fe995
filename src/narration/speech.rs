use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::foundation::error::VizResult;

/// Voice settings for local speech synthesis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechProfile {
    pub rate: f64,
    pub pitch: f64,
    pub volume: f64,
    pub lang: String,
}

impl Default for SpeechProfile {
    fn default() -> Self {
        Self {
            rate: 1.15,
            pitch: 1.0,
            volume: 1.0,
            lang: "en-US".to_owned(),
        }
    }
}

/// One request to a local synthesizer.
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f64,
    pub pitch: f64,
    pub volume: f64,
    pub lang: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>, profile: &SpeechProfile) -> Self {
        Self {
            text: text.into(),
            rate: profile.rate,
            pitch: profile.pitch,
            volume: profile.volume,
            lang: profile.lang.clone(),
        }
    }
}

/// Local text-to-speech.
///
/// `speak` resolves once the utterance has been read out. `cancel` silences whatever is
/// being spoken; the pending `speak` future is dropped by the caller.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, utterance: &Utterance) -> VizResult<()>;

    fn cancel(&self);
}

use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    foundation::{core::saturating_secs, error::VizResult},
    narration::{
        speech::{SpeechSynthesizer, Utterance},
        voice::AudioPlayer,
    },
};

/// Assumed bitrate of voice service audio (MPEG at 128 kbit/s).
const DEFAULT_BITRATE_BPS: u64 = 128_000;
/// Speaking pace at rate 1.0.
const WORDS_PER_MINUTE: f64 = 160.0;

/// Audio player without an output device: waits as long as the audio would play.
#[derive(Debug)]
pub struct PacedPlayer {
    bitrate_bps: u64,
    played: AtomicUsize,
    stopped: AtomicUsize,
}

impl Default for PacedPlayer {
    fn default() -> Self {
        Self::with_bitrate(DEFAULT_BITRATE_BPS)
    }
}

impl PacedPlayer {
    pub fn with_bitrate(bitrate_bps: u64) -> Self {
        Self {
            bitrate_bps: bitrate_bps.max(1),
            played: AtomicUsize::new(0),
            stopped: AtomicUsize::new(0),
        }
    }

    pub fn playing_time(&self, len: usize) -> Duration {
        Duration::from_millis(len as u64 * 8 * 1000 / self.bitrate_bps)
    }

    /// Clips played to completion.
    pub fn played(&self) -> usize {
        self.played.load(Ordering::Relaxed)
    }

    /// Times `stop` was called.
    pub fn stopped(&self) -> usize {
        self.stopped.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AudioPlayer for PacedPlayer {
    async fn play(&self, audio: Vec<u8>) -> VizResult<()> {
        tokio::time::sleep(self.playing_time(audio.len())).await;
        self.played.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&self) {
        self.stopped.fetch_add(1, Ordering::Relaxed);
    }
}

/// Synthesizer that writes each utterance to the log and keeps a transcript.
///
/// `speak` waits for the time the text would take to read out at the utterance's rate.
#[derive(Debug, Default)]
pub struct TranscriptSynthesizer {
    transcript: Mutex<Vec<Utterance>>,
}

impl TranscriptSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every utterance spoken so far, oldest first.
    pub fn transcript(&self) -> Vec<Utterance> {
        self.transcript
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    pub fn speaking_time(utterance: &Utterance) -> Duration {
        let words = utterance.text.split_whitespace().count() as f64;
        let rate = if utterance.rate > 0.0 { utterance.rate } else { 1.0 };
        saturating_secs(words * 60.0 / (WORDS_PER_MINUTE * rate))
    }
}

#[async_trait]
impl SpeechSynthesizer for TranscriptSynthesizer {
    async fn speak(&self, utterance: &Utterance) -> VizResult<()> {
        tracing::info!(text = %utterance.text, rate = utterance.rate, "narration");
        if let Ok(mut t) = self.transcript.lock() {
            t.push(utterance.clone());
        }
        tokio::time::sleep(Self::speaking_time(utterance)).await;
        Ok(())
    }

    fn cancel(&self) {
        tracing::debug!("narration cancelled");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/headless.rs"]
mod tests;

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::foundation::core::{DEFAULT_STEP_DURATION_MS, Millis, Speed};

/// One unit of playback: commands that run together, then narration, then a dwell.
///
/// Commands stay raw until execution so a malformed one only costs itself.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default)]
    pub commands: Vec<Value>,
    #[serde(default)]
    pub narration: Option<String>,
    #[serde(default)]
    pub duration: Option<Millis>,
}

impl Step {
    /// Dwell after the step at `speed`.
    pub fn dwell(&self, speed: Speed) -> Duration {
        let base = self.duration.unwrap_or(Millis(DEFAULT_STEP_DURATION_MS));
        speed.scale(base.as_duration())
    }

    pub fn narration(&self) -> Option<&str> {
        self.narration
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Everything playback needs: setup commands applied on every rebuild, then the steps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    pub setup: Vec<Value>,
    pub steps: Vec<Step>,
}

impl Timeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            setup: Vec::new(),
            steps,
        }
    }

    pub fn with_setup(mut self, setup: Vec<Value>) -> Self {
        self.setup = setup;
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/step.rs"]
mod tests;

/// Convenience result type used across algoscope.
pub type VizResult<T> = Result<T, VizError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Per-command failures inside a step never surface here; they are reported through
/// [`crate::CommandError`] and skipped.
#[derive(thiserror::Error, Debug)]
pub enum VizError {
    /// Invalid caller-provided data (payloads, speeds, configuration values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Scene graph invariants rejected a mutation.
    #[error("scene error: {0}")]
    Scene(String),

    /// Voice service, audio playback or local synthesis failed.
    #[error("narration error: {0}")]
    Narration(String),

    /// The visualization channel failed or gave up reconnecting.
    #[error("channel error: {0}")]
    Channel(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VizError {
    /// Build a [`VizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VizError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`VizError::Narration`] value.
    pub fn narration(msg: impl Into<String>) -> Self {
        Self::Narration(msg.into())
    }

    /// Build a [`VizError::Channel`] value.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Build a [`VizError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

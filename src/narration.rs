//! Narration: exactly one utterance at a time, cancellable at any point.
//!
//! Text goes to an external voice service first and the returned audio is handed to an
//! [`voice::AudioPlayer`]. When the service is missing, unreachable or answers with a
//! non-success status, the text is cleaned up for speech and read by a local
//! [`speech::SpeechSynthesizer`] instead. Failures never reach the caller.

pub mod coordinator;
pub mod headless;
pub mod sanitize;
pub mod speech;
pub mod voice;

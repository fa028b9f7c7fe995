//! Top-level orchestration: payload in, playback out.

pub mod controller;
pub mod payload;

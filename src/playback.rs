//! Step sequencing: play, pause, single-step and seek by replay.

pub mod controller;
pub mod step;

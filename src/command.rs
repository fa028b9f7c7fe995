//! Command decoding and dispatch.
//!
//! Raw step commands arrive in one of two wire shapes. [`wire::normalize`] folds both into a
//! single `(tag, payload)` pair, [`model::Command::decode`] turns that into a typed command, and
//! [`interpreter::Interpreter`] applies typed commands to the scene store and renderer.

/// Per-command failures.
pub mod error;
/// Command executor.
pub mod interpreter;
/// Typed commands.
pub mod model;
/// Wire-shape normalization.
pub mod wire;

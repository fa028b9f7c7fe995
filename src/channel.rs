//! Link to the backend that turns requests into visualization payloads.

pub mod client;
pub mod protocol;
pub mod topics;

/// Scene entities.
pub mod model;
/// Authoritative per-kind entity maps.
pub mod store;

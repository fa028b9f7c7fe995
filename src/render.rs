//! Scene-to-drawing projection.
//!
//! [`projector::Renderer`] turns store mutations into [`backend::RenderOp`]s for any
//! [`backend::RenderBackend`]; [`svg::SvgBackend`] is the bundled backend.

/// Backend seam.
pub mod backend;
/// Entity-to-primitive builders.
pub mod build;
/// Backend-agnostic drawing description.
pub mod primitive;
/// Live index and transition policy.
pub mod projector;
/// SVG display list and rasterizer.
pub mod svg;

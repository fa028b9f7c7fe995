//! Algoscope is a step-based animation engine for algorithm and data-structure walkthroughs.
//!
//! A visualization payload carries an initial scene and a list of steps. Each step holds
//! declarative drawing commands, optional narration and a dwell time. The public API is
//! session-oriented:
//!
//! - Build a [`VisualizationSession`] over a [`RenderBackend`] (the bundled [`SvgBackend`]
//!   or your own) and a [`NarrationCoordinator`]
//! - Load a [`VisualizationPayload`]
//! - Drive it with `play`, `pause`, `step_forward`, `step_backward`, `restart` and speed
//!   controls, observing [`PlaybackSnapshot`]s
//!
//! Commands that fail to decode or reference missing entities are logged and skipped; they
//! never stop playback.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
/// Backend link: wire protocol, reconnecting client, topic presets.
pub mod channel;
/// Command decoding and execution.
pub mod command;
/// Engine configuration.
pub mod config;
/// Voice service, local speech fallback and the narration coordinator.
pub mod narration;
/// Step sequencing.
pub mod playback;
/// Drawing: primitives, projector and the SVG backend.
pub mod render;
/// Scene graph store.
pub mod scene;
/// Visualization session.
pub mod session;

pub use crate::animation::{
    clock::Pacing,
    ease::Ease,
    transition::{Transition, TransitionKind},
};
pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CELL_HEIGHT, CELL_WIDTH, DisplayValue, EntityId, Millis,
    NODE_RADIUS, Point, Position, Rect, Speed, Vec2,
};
pub use crate::foundation::error::{VizError, VizResult};

pub use crate::channel::client::{ChannelClient, ChannelHandle, ConnectionStatus, ReconnectPolicy};
pub use crate::command::error::CommandError;
pub use crate::command::interpreter::{Interpreter, SkippedCommand, StepReport};
pub use crate::command::model::{Command, CommandTag};
pub use crate::config::EngineConfig;
pub use crate::narration::coordinator::{NarrationCoordinator, SpeechOutcome};
pub use crate::playback::controller::{PlaybackController, PlaybackSnapshot, PlaybackStatus};
pub use crate::playback::step::{Step, Timeline};
pub use crate::render::backend::RenderBackend;
pub use crate::render::projector::Renderer;
pub use crate::render::svg::{RasterFrame, SvgBackend};
pub use crate::scene::model::EntityKind;
pub use crate::scene::store::SceneStore;
pub use crate::session::controller::VisualizationSession;
pub use crate::session::payload::{SessionInfo, VisualizationPayload};

use std::{cell::RefCell, rc::Rc};

use crate::{
    animation::transition::Transition,
    foundation::core::{EntityId, Point},
    render::primitive::{Primitive, PrimitiveHandle},
    scene::model::EntityKind,
};

/// One instruction from the [`crate::Renderer`] to a drawing toolkit.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOp {
    /// Create a new primitive, playing `enter`.
    Create {
        /// Drawing.
        primitive: Primitive,
        /// Entry transition.
        enter: Transition,
    },
    /// Replace the drawing of an existing primitive in place.
    Update {
        /// New drawing.
        primitive: Primitive,
        /// Transition toward it.
        transition: Transition,
    },
    /// Move an existing primitive's origin.
    Move {
        /// Final origin.
        to: Point,
        /// Interpolation.
        transition: Transition,
    },
    /// Start fading an existing primitive out. It stays drawn until discarded.
    Exit {
        /// Exit transition.
        transition: Transition,
    },
    /// Drop an existing primitive immediately.
    Discard,
}

/// Pure drawing interface the renderer projects scene mutations onto.
///
/// `target` is the handle previously returned for this id, or `None` for creates. Implementations
/// return the handle that now represents the primitive.
pub trait RenderBackend {
    /// Apply `op` for entity `id` of `kind`.
    fn render(
        &mut self,
        kind: EntityKind,
        id: &EntityId,
        target: Option<PrimitiveHandle>,
        op: &RenderOp,
    ) -> PrimitiveHandle;

    /// Drop every primitive.
    fn clear(&mut self);
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn render(
        &mut self,
        kind: EntityKind,
        id: &EntityId,
        target: Option<PrimitiveHandle>,
        op: &RenderOp,
    ) -> PrimitiveHandle {
        (**self).render(kind, id, target, op)
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// Shared backend, so callers can keep inspecting what the renderer drew.
impl<B: RenderBackend> RenderBackend for Rc<RefCell<B>> {
    fn render(
        &mut self,
        kind: EntityKind,
        id: &EntityId,
        target: Option<PrimitiveHandle>,
        op: &RenderOp,
    ) -> PrimitiveHandle {
        self.borrow_mut().render(kind, id, target, op)
    }

    fn clear(&mut self) {
        self.borrow_mut().clear();
    }
}

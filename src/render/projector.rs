use std::collections::HashMap;

use crate::{
    animation::transition::Transition,
    foundation::core::{EntityId, Point},
    render::{
        backend::{RenderBackend, RenderOp},
        primitive::{Primitive, PrimitiveHandle},
    },
    scene::model::EntityKind,
};

#[derive(Clone, Copy, Debug)]
struct LivePrimitive {
    kind: EntityKind,
    handle: PrimitiveHandle,
    generation: u64,
    exiting: bool,
}

/// Proof that an exit was started for a specific incarnation of an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExitTicket {
    id: EntityId,
    generation: u64,
}

impl ExitTicket {
    /// Id the exit was started for.
    pub fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Projects scene mutations onto a [`RenderBackend`].
///
/// Holds no scene data, only the live index from entity id to backend primitive. A primitive
/// stays in the index while its exit transition plays; creating the same id again during that
/// window discards the exiting primitive at once, and the stale exit completes as a no-op.
pub struct Renderer {
    backend: Box<dyn RenderBackend>,
    live: HashMap<EntityId, LivePrimitive>,
    generation: u64,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("live", &self.live.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Renderer {
    /// Renderer drawing onto `backend`.
    pub fn new(backend: impl RenderBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            live: HashMap::new(),
            generation: 0,
        }
    }

    /// Create the primitive for `id`, replacing whatever is live under that id.
    pub fn show(
        &mut self,
        kind: EntityKind,
        id: &EntityId,
        primitive: Primitive,
        enter: Transition,
    ) -> PrimitiveHandle {
        if let Some(old) = self.live.remove(id) {
            tracing::debug!(%id, exiting = old.exiting, "replacing live primitive");
            self.backend
                .render(old.kind, id, Some(old.handle), &RenderOp::Discard);
        }

        let handle = self
            .backend
            .render(kind, id, None, &RenderOp::Create { primitive, enter });
        self.generation += 1;
        self.live.insert(
            id.clone(),
            LivePrimitive {
                kind,
                handle,
                generation: self.generation,
                exiting: false,
            },
        );
        handle
    }

    /// Redraw a live primitive in place. Returns `false` when `id` is absent or exiting.
    pub fn refresh(&mut self, id: &EntityId, primitive: Primitive, transition: Transition) -> bool {
        self.apply(id, RenderOp::Update {
            primitive,
            transition,
        })
    }

    /// Move a live primitive's origin. Returns `false` when `id` is absent or exiting.
    pub fn move_to(&mut self, id: &EntityId, to: Point, transition: Transition) -> bool {
        self.apply(id, RenderOp::Move { to, transition })
    }

    fn apply(&mut self, id: &EntityId, op: RenderOp) -> bool {
        let Some(entry) = self.live.get_mut(id).filter(|e| !e.exiting) else {
            return false;
        };
        entry.handle = self.backend.render(entry.kind, id, Some(entry.handle), &op);
        true
    }

    /// Start the exit transition of `id`.
    ///
    /// Returns `None` when `id` is absent or already exiting.
    pub fn begin_exit(&mut self, id: &EntityId, transition: Transition) -> Option<ExitTicket> {
        let entry = self.live.get_mut(id).filter(|e| !e.exiting)?;
        entry.exiting = true;
        entry.handle = self.backend.render(
            entry.kind,
            id,
            Some(entry.handle),
            &RenderOp::Exit { transition },
        );
        Some(ExitTicket {
            id: id.clone(),
            generation: entry.generation,
        })
    }

    /// Drop the exited primitive from the index.
    ///
    /// Returns `false` when the id was re-created since `ticket` was issued; the new primitive
    /// is left untouched.
    pub fn finish_exit(&mut self, ticket: &ExitTicket) -> bool {
        match self.live.get(&ticket.id) {
            Some(entry) if entry.generation == ticket.generation => {
                let entry = *entry;
                self.live.remove(&ticket.id);
                self.backend
                    .render(entry.kind, &ticket.id, Some(entry.handle), &RenderOp::Discard);
                true
            }
            _ => false,
        }
    }

    /// Drop `id` immediately, without an exit transition.
    pub fn discard(&mut self, id: &EntityId) -> bool {
        match self.live.remove(id) {
            Some(entry) => {
                self.backend
                    .render(entry.kind, id, Some(entry.handle), &RenderOp::Discard);
                true
            }
            None => false,
        }
    }

    /// Backend handle currently representing `id`.
    pub fn handle(&self, id: &str) -> Option<PrimitiveHandle> {
        self.live.get(id).map(|e| e.handle)
    }

    /// Whether `id` is in the live index (exiting primitives included).
    pub fn contains(&self, id: &str) -> bool {
        self.live.contains_key(id)
    }

    /// Whether `id` is playing its exit transition.
    pub fn is_exiting(&self, id: &str) -> bool {
        self.live.get(id).is_some_and(|e| e.exiting)
    }

    /// Number of primitives in the live index.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of live primitives of `kind`.
    pub fn live_count_of(&self, kind: EntityKind) -> usize {
        self.live.values().filter(|e| e.kind == kind).count()
    }

    /// Clear the index and the backend.
    pub fn reset(&mut self) {
        self.live.clear();
        self.backend.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/projector.rs"]
mod tests;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    foundation::{
        core::EntityId,
        error::{VizError, VizResult},
    },
    scene::model::{Annotation, ArrayEntity, Edge, EntityKind, Label, Node, Pointer},
};

mod sealed {
    pub trait Sealed {}
}

/// An entity type with its own table in [`SceneStore`].
pub trait Entity: sealed::Sealed + Sized + 'static {
    /// Kind tag of this table.
    const KIND: EntityKind;

    /// Identifier of this entity.
    fn id(&self) -> &EntityId;

    #[doc(hidden)]
    fn table(store: &SceneStore) -> &BTreeMap<EntityId, Self>;

    #[doc(hidden)]
    fn table_mut(store: &mut SceneStore) -> &mut BTreeMap<EntityId, Self>;
}

macro_rules! entity_table {
    ($ty:ty, $kind:expr, $field:ident) => {
        impl sealed::Sealed for $ty {}

        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> &EntityId {
                &self.id
            }

            fn table(store: &SceneStore) -> &BTreeMap<EntityId, Self> {
                &store.$field
            }

            fn table_mut(store: &mut SceneStore) -> &mut BTreeMap<EntityId, Self> {
                &mut store.$field
            }
        }
    };
}

entity_table!(Node, EntityKind::Node, nodes);
entity_table!(Edge, EntityKind::Edge, edges);
entity_table!(ArrayEntity, EntityKind::Array, arrays);
entity_table!(Pointer, EntityKind::Pointer, pointers);
entity_table!(Label, EntityKind::Label, labels);
entity_table!(Annotation, EntityKind::Annotation, annotations);

/// Authoritative scene state: one map per entity kind, keyed by id.
///
/// Pure data. An id belongs to at most one kind at a time.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SceneStore {
    nodes: BTreeMap<EntityId, Node>,
    edges: BTreeMap<EntityId, Edge>,
    arrays: BTreeMap<EntityId, ArrayEntity>,
    pointers: BTreeMap<EntityId, Pointer>,
    labels: BTreeMap<EntityId, Label>,
    annotations: BTreeMap<EntityId, Annotation>,
}

impl SceneStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity, returning the replaced value.
    ///
    /// Fails when the id is currently held by an entity of another kind.
    pub fn insert<T: Entity>(&mut self, entity: T) -> VizResult<Option<T>> {
        if let Some(kind) = self.kind_of(entity.id().as_str())
            && kind != T::KIND
        {
            return Err(VizError::scene(format!(
                "id '{}' is already a {kind}, cannot insert it as a {}",
                entity.id(),
                T::KIND
            )));
        }
        Ok(T::table_mut(self).insert(entity.id().clone(), entity))
    }

    /// Lookup by id.
    pub fn get<T: Entity>(&self, id: &str) -> Option<&T> {
        T::table(self).get(id)
    }

    /// Mutable lookup by id.
    pub fn get_mut<T: Entity>(&mut self, id: &str) -> Option<&mut T> {
        T::table_mut(self).get_mut(id)
    }

    /// Remove by id.
    pub fn remove<T: Entity>(&mut self, id: &str) -> Option<T> {
        T::table_mut(self).remove(id)
    }

    /// Whether an entity of kind `T` has this id.
    pub fn contains<T: Entity>(&self, id: &str) -> bool {
        T::table(self).contains_key(id)
    }

    /// Iterate entities of kind `T` in id order.
    pub fn iter<T: Entity>(&self) -> impl Iterator<Item = &T> {
        T::table(self).values()
    }

    /// Number of entities of kind `T`.
    pub fn count<T: Entity>(&self) -> usize {
        T::table(self).len()
    }

    /// Kind currently holding `id`, if any.
    pub fn kind_of(&self, id: &str) -> Option<EntityKind> {
        if self.nodes.contains_key(id) {
            Some(EntityKind::Node)
        } else if self.edges.contains_key(id) {
            Some(EntityKind::Edge)
        } else if self.arrays.contains_key(id) {
            Some(EntityKind::Array)
        } else if self.pointers.contains_key(id) {
            Some(EntityKind::Pointer)
        } else if self.labels.contains_key(id) {
            Some(EntityKind::Label)
        } else if self.annotations.contains_key(id) {
            Some(EntityKind::Annotation)
        } else {
            None
        }
    }

    /// Ids of edges with `node` as either endpoint.
    pub fn edges_touching(&self, node: &str) -> Vec<EntityId> {
        self.edges
            .values()
            .filter(|e| e.from.as_str() == node || e.to.as_str() == node)
            .map(|e| e.id.clone())
            .collect()
    }

    /// Total number of entities of all kinds.
    pub fn len(&self) -> usize {
        self.nodes.len()
            + self.edges.len()
            + self.arrays.len()
            + self.pointers.len()
            + self.labels.len()
            + self.annotations.len()
    }

    /// Whether the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear every map.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;

//! Schema description nodes.
//!
//! Entities, attributes and relationships are owned structs with private
//! fields. Reads go through getters; every setter is checked by the
//! finalization guard. Cross-entity links are arena indices (`EntityId`,
//! `RelationshipRef`) into the registry that produced them.

mod attribute;
mod entity;
mod relationship;

pub use attribute::{Attribute, AttributeOptions};
pub use entity::{Entity, Property};
pub use relationship::Relationship;

use serde::Serialize;
use std::fmt::{self, Display};

///
/// EntityId
/// Stable index of an entity inside one registry.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

///
/// RelationshipRef
/// Points at one relationship of one entity inside a registry.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct RelationshipRef {
    pub entity: EntityId,
    pub index: usize,
}

impl RelationshipRef {
    #[must_use]
    pub const fn new(entity: EntityId, index: usize) -> Self {
        Self { entity, index }
    }
}

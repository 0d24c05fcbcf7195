use crate::metadata::PropertyMetadata;
use std::{
    any::{TypeId, type_name},
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
};

///
/// PersistentModel
///
/// Implemented by every declared persistent model type. This is the
/// boundary to the property-declaration collaborator: it names the entity
/// and lists the declared properties in source order.
///

pub trait PersistentModel: 'static {
    const ENTITY_NAME: &'static str;

    /// Previous entity name, recorded as the renaming identifier.
    const ORIGINAL_NAME: Option<&'static str> = None;

    const HASH_MODIFIER: Option<&'static str> = None;

    /// Declared properties in source order.
    fn schema_metadata() -> Vec<PropertyMetadata>;
}

///
/// ModelType
///
/// Type-erased handle for one `PersistentModel` type.
/// Identity (equality, hashing) is the Rust `TypeId` only.
///

#[derive(Clone, Copy)]
pub struct ModelType {
    id: TypeId,
    type_name: &'static str,
    entity_name: &'static str,
    original_name: Option<&'static str>,
    hash_modifier: Option<&'static str>,
    metadata: fn() -> Vec<PropertyMetadata>,
}

impl ModelType {
    #[must_use]
    pub fn of<M: PersistentModel>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            type_name: type_name::<M>(),
            entity_name: M::ENTITY_NAME,
            original_name: M::ORIGINAL_NAME,
            hash_modifier: M::HASH_MODIFIER,
            metadata: M::schema_metadata,
        }
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified Rust type name (diagnostics only).
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    #[must_use]
    pub const fn original_name(&self) -> Option<&'static str> {
        self.original_name
    }

    #[must_use]
    pub const fn hash_modifier(&self) -> Option<&'static str> {
        self.hash_modifier
    }

    /// Every declared property of the type, in source order.
    #[must_use]
    pub fn declared_properties(&self) -> Vec<PropertyMetadata> {
        (self.metadata)()
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelType {}

impl Hash for ModelType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelType({})", self.type_name)
    }
}

impl Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name)
    }
}

///
/// AccessorToken
///
/// Opaque identity of one declared property of one model type.
/// Only ever compared; never used to read or write a field.
///

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct AccessorToken {
    owner: TypeId,
    owner_name: &'static str,
    property: &'static str,
}

impl AccessorToken {
    #[must_use]
    pub fn of<M: PersistentModel>(property: &'static str) -> Self {
        Self {
            owner: TypeId::of::<M>(),
            owner_name: M::ENTITY_NAME,
            property,
        }
    }

    #[must_use]
    pub const fn property(&self) -> &'static str {
        self.property
    }

    #[must_use]
    pub fn is_owned_by(&self, model: &ModelType) -> bool {
        self.owner == model.id()
    }
}

impl Debug for AccessorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessorToken({self})")
    }
}

impl Display for AccessorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}.{}", self.owner_name, self.property)
    }
}

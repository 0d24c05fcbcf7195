//! Persistence schema graph.
//!
//! Declared model types are classified into attributes and relationships,
//! built into entity descriptions, cross-linked with their destinations and
//! inverses, then frozen and cached by a `SchemaRegistry`.

pub mod build;
pub mod classify;
pub mod finalize;
pub mod metadata;
pub mod model;
pub mod node;
pub mod registry;
pub mod schema;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_fixtures;

use crate::{build::BuildError, registry::RegistryError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        finalize::Finalizable,
        metadata::{PropertyMetadata, PropertyTemplate},
        model::{AccessorToken, ModelType, PersistentModel},
        node::*,
        registry::{Diagnostic, Resolution, SchemaRegistry},
        schema::{Schema, SchemaVersion, VersionedSchema},
        types::{AttributeKind, Cardinality, DeleteRule},
        value::{OrderedSet, SchemaValue, Value, ValueType},
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    BuildError(#[from] BuildError),

    #[error(transparent)]
    RegistryError(#[from] RegistryError),
}

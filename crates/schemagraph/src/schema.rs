use crate::{Error, model::ModelType, node::Entity, registry::SchemaRegistry};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    any::TypeId,
    collections::{BTreeSet, HashMap},
    str::FromStr,
    sync::{Arc, LazyLock, Mutex},
};
use thiserror::Error as ThisError;

///
/// VersionParseError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum VersionParseError {
    #[error("invalid version component '{component}' in '{input}'")]
    InvalidComponent { input: String, component: String },

    #[error("expected major.minor.patch, got '{0}'")]
    WrongComponentCount(String),
}

///
/// SchemaVersion
///
/// Opaque `major.minor.patch` tag carried by a schema. Never interpreted
/// during resolution.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[display("{major}.{minor}.{patch}")]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SchemaVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        let [major, minor, patch] = parts[..] else {
            return Err(VersionParseError::WrongComponentCount(s.to_string()));
        };

        let parse = |component: &str| {
            component
                .parse::<u32>()
                .map_err(|_| VersionParseError::InvalidComponent {
                    input: s.to_string(),
                    component: component.to_string(),
                })
        };

        Ok(Self::new(parse(major)?, parse(minor)?, parse(patch)?))
    }
}

///
/// VersionedSchema
/// One named generation of a schema: its version and model types.
///

pub trait VersionedSchema {
    const VERSION: SchemaVersion;

    fn models() -> Vec<ModelType>;
}

///
/// Schema
///
/// Version-tagged set of resolved entities: the requested model types
/// followed by everything they reach.
///

#[derive(Clone, Debug, Serialize)]
pub struct Schema {
    version: SchemaVersion,
    entities: Vec<Entity>,
}

impl Schema {
    /// Resolve `models` in the shared registry.
    ///
    /// # Panics
    /// Panics when the declarations are malformed.
    #[must_use]
    pub fn new(models: &[ModelType], version: SchemaVersion) -> Self {
        Self::with_registry(SchemaRegistry::shared(), models, version)
    }

    /// # Panics
    /// Panics when the declarations are malformed.
    #[must_use]
    pub fn with_registry(
        registry: &SchemaRegistry,
        models: &[ModelType],
        version: SchemaVersion,
    ) -> Self {
        match Self::try_with_registry(registry, models, version) {
            Ok(schema) => schema,
            Err(err) => panic!("schema {version} failed to resolve: {err}"),
        }
    }

    pub fn try_with_registry(
        registry: &SchemaRegistry,
        models: &[ModelType],
        version: SchemaVersion,
    ) -> Result<Self, Error> {
        let entities = registry.resolve_closure(models)?;

        Ok(Self { version, entities })
    }

    #[must_use]
    pub fn versioned<V: VersionedSchema>() -> Self {
        Self::versioned_with_registry::<V>(SchemaRegistry::shared())
    }

    #[must_use]
    pub fn versioned_with_registry<V: VersionedSchema>(registry: &SchemaRegistry) -> Self {
        Self::with_registry(registry, &V::models(), V::VERSION)
    }

    /// One shared schema per distinct set of model types, resolved in the
    /// shared registry with the default version.
    #[must_use]
    pub fn cached(models: &[ModelType]) -> Arc<Self> {
        Self::cached_with_version(models, SchemaVersion::default())
    }

    /// Cached schema for a versioned schema's model set, tagged with its
    /// version.
    #[must_use]
    pub fn cached_versioned<V: VersionedSchema>() -> Arc<Self> {
        Self::cached_with_version(&V::models(), V::VERSION)
    }

    /// One shared schema per version and set of model types. Failed
    /// resolutions are not cached.
    ///
    /// # Panics
    /// Panics when the declarations are malformed. The cache lock is
    /// released first, so later calls are unaffected.
    #[must_use]
    pub fn cached_with_version(models: &[ModelType], version: SchemaVersion) -> Arc<Self> {
        type CacheKey = (SchemaVersion, BTreeSet<TypeId>);
        static CACHE: LazyLock<Mutex<HashMap<CacheKey, Arc<Schema>>>> =
            LazyLock::new(Mutex::default);

        let key: CacheKey = (version, models.iter().map(ModelType::id).collect());
        let mut cache = CACHE.lock().expect("schema cache mutex poisoned");

        if let Some(schema) = cache.get(&key) {
            return Arc::clone(schema);
        }

        match Self::try_with_registry(SchemaRegistry::shared(), models, version) {
            Ok(schema) => Arc::clone(cache.entry(key).or_insert_with(|| Arc::new(schema))),
            Err(err) => {
                drop(cache);
                panic!("schema {version} failed to resolve: {err}");
            }
        }
    }

    #[must_use]
    pub const fn version(&self) -> SchemaVersion {
        self.version
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn entity_named(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name() == name)
    }
}

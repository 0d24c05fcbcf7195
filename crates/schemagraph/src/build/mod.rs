//! Entity builder: turns one model type's declared properties into an
//! unresolved `Entity` skeleton. Destinations and inverses are left for the
//! registry; this module never touches registry state.

mod fixup;

use crate::{
    classify::{RelationshipTargetType, classify},
    metadata::{PropertyMetadata, PropertyTemplate},
    model::ModelType,
    node::{Attribute, Entity, Property, Relationship},
};
use thiserror::Error as ThisError;
use tracing::trace;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("entity '{entity}' declares property '{property}' more than once")]
    DuplicateProperty { entity: String, property: String },

    #[error(
        "entity '{entity}', property '{property}': relationship declared on non-model value type {value_type}"
    )]
    RelationshipOnAttribute {
        entity: String,
        property: String,
        value_type: String,
    },

    #[error("entity '{entity}', relationship '{property}' declares a default value")]
    RelationshipDefault { entity: String, property: String },
}

/// Build the entity skeleton for `model`.
pub fn build_entity(model: ModelType) -> Result<Entity, BuildError> {
    let mut entity = Entity::new(model);

    for meta in model.declared_properties() {
        if meta.transient {
            continue;
        }

        let property = build_property(&entity, &meta)?;

        if entity.has_property(property.name()) {
            return Err(BuildError::DuplicateProperty {
                entity: entity.name().to_string(),
                property: property.name().to_string(),
            });
        }

        let unique = property.is_unique();
        let name = property.name().to_string();
        entity.push_property(property);

        if unique {
            entity.add_unique_property(&name);
        }
    }

    trace!(
        entity = entity.name(),
        attributes = entity.attributes().len(),
        relationships = entity.relationships().len(),
        "built entity skeleton"
    );

    Ok(entity)
}

// Copy-and-fixup a template when present, otherwise synthesize from the value type.
fn build_property(entity: &Entity, meta: &PropertyMetadata) -> Result<Property, BuildError> {
    let target = classify(&meta.value_type);

    match &meta.template {
        Some(PropertyTemplate::Attribute(template)) => {
            let mut attribute = template.copy_template();
            fixup::attribute(&mut attribute, &target, meta);

            Ok(Property::Attribute(attribute))
        }
        Some(PropertyTemplate::Relationship(template)) => {
            if !target.is_relationship() {
                return Err(BuildError::RelationshipOnAttribute {
                    entity: entity.name().to_string(),
                    property: meta.name.to_string(),
                    value_type: meta.value_type.to_string(),
                });
            }

            let mut relationship = template.copy_template();
            fixup::relationship(entity, &mut relationship, &target, meta)?;

            Ok(Property::Relationship(relationship))
        }
        None => create_property(entity, &target, meta),
    }
}

fn create_property(
    entity: &Entity,
    target: &RelationshipTargetType,
    meta: &PropertyMetadata,
) -> Result<Property, BuildError> {
    if target.is_relationship() {
        let mut relationship = Relationship::template();
        fixup::relationship(entity, &mut relationship, target, meta)?;

        Ok(Property::Relationship(relationship))
    } else {
        let mut attribute = Attribute::template();
        fixup::attribute(&mut attribute, target, meta);

        Ok(Property::Attribute(attribute))
    }
}

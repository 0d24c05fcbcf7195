//! Fill the fields a template left blank. Anything already set on the
//! template survives untouched.

use crate::{
    build::BuildError,
    classify::RelationshipTargetType,
    metadata::PropertyMetadata,
    node::{Attribute, Entity, Relationship},
    types::{AttributeKind, Cardinality},
};

pub(super) fn attribute(
    attribute: &mut Attribute,
    target: &RelationshipTargetType,
    meta: &PropertyMetadata,
) {
    if attribute.name().is_empty() {
        attribute.set_name(meta.name);
    }

    if attribute.kind().is_none() {
        let (kind, optional) = match target {
            RelationshipTargetType::Attribute { kind, optional } => (*kind, *optional),
            // an attribute template over a model reference stores it opaquely
            other => (AttributeKind::Transformable, other.is_optional()),
        };
        attribute.set_kind(kind, optional);
    }

    if attribute.default_value().is_none()
        && let Some(value) = &meta.default_value
    {
        attribute.set_default_value(Some(value.clone()));
    }
}

pub(super) fn relationship(
    entity: &Entity,
    relationship: &mut Relationship,
    target: &RelationshipTargetType,
    meta: &PropertyMetadata,
) -> Result<(), BuildError> {
    if meta.default_value.is_some() {
        return Err(BuildError::RelationshipDefault {
            entity: entity.name().to_string(),
            property: meta.name.to_string(),
        });
    }

    if relationship.name().is_empty() {
        relationship.set_name(meta.name);
    }

    if relationship.cardinality().is_none() {
        let cardinality = match target {
            RelationshipTargetType::ToMany { .. } => Cardinality::ToMany { ordered: false },
            RelationshipTargetType::ToOrderedSet { .. } => Cardinality::ToMany { ordered: true },
            _ => Cardinality::ToOne,
        };
        relationship.set_cardinality(cardinality);
        relationship.set_optional(target.is_optional());
    }

    if relationship.accessor().is_none() {
        relationship.set_accessor(Some(meta.accessor));
    }

    if relationship.value_type().is_none() {
        relationship.set_value_type(meta.value_type.clone());
    }

    Ok(())
}

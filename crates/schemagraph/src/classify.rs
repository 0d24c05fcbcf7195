//! Type classification: decides from a declared value-type shape whether a
//! property becomes an attribute, a to-one, a to-many or an ordered to-many
//! relationship.
//!
//! Rules are applied in order and look at the static shape only:
//! 1. a model reference is a required to-one
//! 2. an optional model reference is an optional to-one (one level only)
//! 3. an array or set of model references is a to-many
//! 4. an ordered-set marker is an ordered to-many
//! 5. a scalar, or a scalar under one optional/array/set, is an attribute
//! 6. anything else is a transformable attribute

use crate::{
    model::ModelType,
    types::{AttributeKind, CollectionKind},
    value::ValueType,
};

///
/// RelationshipTargetType
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RelationshipTargetType {
    Attribute {
        kind: AttributeKind,
        optional: bool,
    },
    ToOne {
        model: ModelType,
        optional: bool,
    },
    ToMany {
        collection: CollectionKind,
        model: ModelType,
        optional: bool,
    },
    ToOrderedSet {
        model: ModelType,
        optional: bool,
    },
}

impl RelationshipTargetType {
    #[must_use]
    pub const fn is_relationship(&self) -> bool {
        !matches!(self, Self::Attribute { .. })
    }

    /// The model type on the other side of a relationship.
    #[must_use]
    pub const fn model(&self) -> Option<ModelType> {
        match self {
            Self::Attribute { .. } => None,
            Self::ToOne { model, .. }
            | Self::ToMany { model, .. }
            | Self::ToOrderedSet { model, .. } => Some(*model),
        }
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        match self {
            Self::Attribute { optional, .. }
            | Self::ToOne { optional, .. }
            | Self::ToMany { optional, .. }
            | Self::ToOrderedSet { optional, .. } => *optional,
        }
    }
}

/// Classify a declared value type.
#[must_use]
pub fn classify(value_type: &ValueType) -> RelationshipTargetType {
    if let Some(target) = classify_relationship(value_type) {
        return target;
    }

    classify_attribute(value_type)
}

// Rules 1-4.
fn classify_relationship(value_type: &ValueType) -> Option<RelationshipTargetType> {
    let (inner, optional) = match value_type {
        ValueType::Optional(inner) => (inner.as_ref(), true),
        other => (other, false),
    };

    match inner {
        ValueType::Model(model) => Some(RelationshipTargetType::ToOne {
            model: *model,
            optional,
        }),
        ValueType::Array(element) | ValueType::Set(element) => {
            let ValueType::Model(model) = element.as_ref() else {
                return None;
            };
            let collection = if matches!(inner, ValueType::Set(_)) {
                CollectionKind::Set
            } else {
                CollectionKind::Array
            };

            Some(RelationshipTargetType::ToMany {
                collection,
                model: *model,
                optional,
            })
        }
        ValueType::OrderedSet(model) => Some(RelationshipTargetType::ToOrderedSet {
            model: *model,
            optional,
        }),
        _ => None,
    }
}

// Rules 5-6.
fn classify_attribute(value_type: &ValueType) -> RelationshipTargetType {
    let optional = value_type.is_optional();

    let kind = match value_type {
        ValueType::Scalar(kind) => *kind,
        ValueType::Optional(inner) => match inner.as_ref() {
            ValueType::Scalar(kind) => *kind,
            // nested optionals and optional collections are opaque payloads
            _ => AttributeKind::Transformable,
        },
        // a primitive collection still needs an encode transform
        _ => AttributeKind::Transformable,
    };

    RelationshipTargetType::Attribute { kind, optional }
}

//! Fixture model types shared by the unit tests.
//!
//! Each module declares a small schema by hand, the way generated
//! `PersistentModel` impls would.

use crate::{
    metadata::PropertyMetadata,
    model::{AccessorToken, PersistentModel},
    value::SchemaValue,
};

/// Metadata for property `name` of `M`, typed `T`.
pub fn field<M: PersistentModel, T: SchemaValue>(name: &'static str) -> PropertyMetadata {
    PropertyMetadata::of::<T>(name, AccessorToken::of::<M>(name))
}

// model!
// declares a unit model type with an entity name and its property list
macro_rules! model {
    ($ty:ident, $entity:literal, [$($meta:expr),* $(,)?]) => {
        #[allow(dead_code)]
        pub struct $ty;

        impl $crate::model::PersistentModel for $ty {
            const ENTITY_NAME: &'static str = $entity;

            fn schema_metadata() -> Vec<$crate::metadata::PropertyMetadata> {
                vec![$($meta),*]
            }
        }
    };
}

///
/// person_address
/// Person and Address with an explicit inverse token on `addresses`.
///

pub mod person_address {
    use super::field;
    use crate::{model::AccessorToken, node::Relationship};
    use std::collections::BTreeSet;

    model!(
        Person,
        "Person",
        [
            field::<Self, String>("firstname"),
            field::<Self, String>("lastname"),
            field::<Self, BTreeSet<Address>>("addresses").with_template(
                Relationship::template().inverse(AccessorToken::of::<Address>("person"))
            ),
        ]
    );

    model!(
        Address,
        "Address",
        [
            field::<Self, String>("street"),
            field::<Self, Option<String>>("appartment"),
            field::<Self, Person>("person"),
        ]
    );
}

///
/// no_inverse
/// Address points at Person; Person declares nothing back.
///

pub mod no_inverse {
    use super::field;

    model!(Person, "Person", [field::<Self, String>("name")]);

    model!(
        Address,
        "Address",
        [
            field::<Self, String>("street"),
            field::<Self, Person>("person"),
        ]
    );
}

pub mod unique {
    use super::field;
    use crate::node::{Attribute, AttributeOptions, Relationship};

    model!(
        UniquePerson,
        "UniquePerson",
        [
            field::<Self, String>("firstname").with_template(Attribute::template().unique()),
            field::<Self, String>("lastname"),
        ]
    );

    // one badge per holder; the code is kept outside the record
    model!(
        Badge,
        "Badge",
        [
            field::<Self, String>("code").with_template(Attribute::template().with_options(
                AttributeOptions {
                    external_storage: true,
                    allows_cloud_encryption: true,
                    ..AttributeOptions::default()
                }
            )),
            field::<Self, UniquePerson>("holder").with_template(Relationship::template().unique()),
        ]
    );
}

///
/// ambiguous
/// Employee has two relationships back to Department and neither side
/// names an inverse.
///

pub mod ambiguous {
    use super::field;

    model!(
        Department,
        "Department",
        [
            field::<Self, String>("name"),
            field::<Self, Vec<Employee>>("employees"),
        ]
    );

    model!(
        Employee,
        "Employee",
        [
            field::<Self, String>("name"),
            field::<Self, Department>("department"),
            field::<Self, Option<Department>>("managed"),
        ]
    );
}

///
/// todo
/// Lists, entries and tags. Covers templates, defaults, transient and
/// ordered properties.
///

pub mod todo {
    use super::field;
    use crate::{
        metadata::PropertyMetadata,
        model::AccessorToken,
        node::{Attribute, Relationship},
        types::DeleteRule,
        value::{OrderedSet, ValueType},
    };
    use std::time::SystemTime;

    model!(
        ToDoList,
        "ToDoList",
        [
            field::<Self, String>("title"),
            field::<Self, Vec<ToDo>>("entries")
                .with_template(Relationship::template().with_delete_rule(DeleteRule::Cascade)),
        ]
    );

    model!(
        ToDo,
        "ToDo",
        [
            field::<Self, String>("title"),
            field::<Self, bool>("is_done").with_default(false),
            field::<Self, Option<SystemTime>>("due"),
            PropertyMetadata::new(
                "priority",
                AccessorToken::of::<Self>("priority"),
                ValueType::Custom("Priority"),
            )
            .with_template(
                Attribute::template()
                    .transformable("PriorityTransformer")
                    .with_default_value(3)
            ),
            field::<Self, bool>("is_overdue").transient(),
            field::<Self, ToDoList>("list")
                .with_template(Relationship::template().with_delete_rule(DeleteRule::Nullify)),
            field::<Self, OrderedSet<Tag>>("tags").with_template(
                Relationship::template()
                    .named("tags")
                    .with_delete_rule(DeleteRule::Cascade)
                    .with_max_count(8)
            ),
        ]
    );

    model!(
        Tag,
        "Tag",
        [field::<Self, String>("label").with_template(Attribute::template().unique())]
    );
}

///
/// graph
/// Self-referential tree node.
///

pub mod graph {
    use super::field;
    use crate::{model::AccessorToken, node::Relationship};

    model!(
        Node,
        "Node",
        [
            field::<Self, String>("name"),
            field::<Self, Option<Node>>("parent"),
            field::<Self, Vec<Node>>("children")
                .with_template(Relationship::template().inverse(AccessorToken::of::<Node>("parent"))),
        ]
    );
}

///
/// broken
/// Declarations that must be rejected.
///

pub mod broken {
    use super::{field, person_address::Person, todo::Tag};
    use crate::{model::AccessorToken, node::Relationship};

    model!(
        DuplicateName,
        "DuplicateName",
        [
            field::<Self, String>("name"),
            field::<Self, Option<String>>("name"),
        ]
    );

    model!(
        RelationshipOnText,
        "RelationshipOnText",
        [field::<Self, String>("title").with_template(Relationship::template())]
    );

    model!(
        DefaultedRelationship,
        "DefaultedRelationship",
        [field::<Self, Person>("owner").with_default("nobody")]
    );

    model!(
        Dangling,
        "Dangling",
        [field::<Self, Tag>("tag")
            .with_template(Relationship::template().inverse(AccessorToken::of::<Tag>("owner")))]
    );

    model!(SameNameLeft, "Shadow", [field::<Self, SameNameRight>("other")]);

    model!(SameNameRight, "Shadow", [field::<Self, String>("label")]);
}

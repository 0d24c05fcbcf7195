use crate::{
    finalize::{Finalizable, ObjectId},
    model::ModelType,
    node::{Attribute, Relationship},
};
use serde::{Serialize, Serializer};

///
/// Property
///

#[derive(Clone, Debug)]
pub enum Property {
    Attribute(Attribute),
    Relationship(Relationship),
}

impl Property {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(attribute) => attribute.name(),
            Self::Relationship(relationship) => relationship.name(),
        }
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        match self {
            Self::Attribute(attribute) => attribute.is_unique(),
            Self::Relationship(relationship) => relationship.is_unique(),
        }
    }
}

///
/// Entity
///
/// Schema description of one persistent model type.
///

#[derive(Clone, Debug, Serialize)]
pub struct Entity {
    #[serde(skip)]
    id: ObjectId,
    name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    original_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    hash_modifier: Option<String>,

    attributes: Vec<Attribute>,
    relationships: Vec<Relationship>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    uniqueness_constraints: Vec<Vec<String>>,

    #[serde(serialize_with = "serialize_backing_type")]
    backing_type: ModelType,
}

impl Entity {
    /// An empty entity for `backing_type`, named after its entity name.
    #[must_use]
    pub fn new(backing_type: ModelType) -> Self {
        Self {
            id: ObjectId::next(),
            name: backing_type.entity_name().to_string(),
            original_name: backing_type.original_name().map(str::to_string),
            hash_modifier: backing_type.hash_modifier().map(str::to_string),
            attributes: Vec::new(),
            relationships: Vec::new(),
            uniqueness_constraints: Vec::new(),
            backing_type,
        }
    }

    //
    // getters
    //

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    #[must_use]
    pub fn hash_modifier(&self) -> Option<&str> {
        self.hash_modifier.as_deref()
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    #[must_use]
    pub fn uniqueness_constraints(&self) -> &[Vec<String>] {
        &self.uniqueness_constraints
    }

    #[must_use]
    pub const fn backing_type(&self) -> ModelType {
        self.backing_type
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name() == name)
    }

    /// Index of the named relationship, in declaration order.
    #[must_use]
    pub fn relationship_index(&self, name: &str) -> Option<usize> {
        self.relationships.iter().position(|r| r.name() == name)
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.attribute(name).is_some() || self.relationship(name).is_some()
    }

    #[must_use]
    pub fn property_count(&self) -> usize {
        self.attributes.len() + self.relationships.len()
    }

    // is_property_unique
    // true if a single-property constraint on `name` already exists
    fn is_property_unique(&self, name: &str) -> bool {
        self.uniqueness_constraints
            .iter()
            .any(|constraint| constraint.len() == 1 && constraint[0] == name)
    }

    //
    // setters
    //

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.ensure_not_finalized();
        self.name = name.into();
    }

    /// Append a property in declaration order.
    pub fn push_property(&mut self, property: Property) {
        self.ensure_not_finalized();
        match property {
            Property::Attribute(attribute) => self.attributes.push(attribute),
            Property::Relationship(relationship) => self.relationships.push(relationship),
        }
    }

    /// Add a uniqueness constraint unless an equivalent one exists.
    /// Returns true when the constraint was added.
    pub fn add_uniqueness_constraint<I, S>(&mut self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_not_finalized();

        let mut constraint: Vec<String> = names.into_iter().map(Into::into).collect();
        constraint.sort();
        constraint.dedup();

        let exists = self.uniqueness_constraints.iter().any(|existing| {
            let mut existing = existing.clone();
            existing.sort();
            existing == constraint
        });
        if exists || constraint.is_empty() {
            return false;
        }

        self.uniqueness_constraints.push(constraint);
        true
    }

    /// Add `[name]` as a constraint unless the property is already unique.
    pub fn add_unique_property(&mut self, name: &str) -> bool {
        if self.is_property_unique(name) {
            return false;
        }

        self.add_uniqueness_constraint([name])
    }

    /// Mutable access to one relationship; its own setters stay guarded.
    pub fn relationship_mut(&mut self, index: usize) -> Option<&mut Relationship> {
        self.ensure_not_finalized();
        self.relationships.get_mut(index)
    }

    /// Finalize the entity and every member.
    pub fn finalize(&self) {
        for attribute in &self.attributes {
            attribute.mark_finalized();
        }
        for relationship in &self.relationships {
            relationship.mark_finalized();
        }
        self.mark_finalized();
    }
}

impl Finalizable for Entity {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn describe(&self) -> String {
        format!("entity '{}'", self.name)
    }
}

fn serialize_backing_type<S: Serializer>(model: &ModelType, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(model.type_name())
}

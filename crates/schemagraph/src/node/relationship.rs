use crate::{
    classify::classify,
    finalize::{Finalizable, ObjectId},
    model::{AccessorToken, ModelType},
    node::{EntityId, RelationshipRef},
    types::{Cardinality, DeleteRule},
    value::ValueType,
};
use serde::Serialize;

///
/// Relationship
///
/// Object-valued property linking one entity to another. Destination and
/// inverse links start empty and are filled by the registry during one
/// resolution pass; afterwards the relationship is finalized.
///

#[derive(Clone, Debug, Serialize)]
pub struct Relationship {
    #[serde(skip)]
    id: ObjectId,
    name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    original_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    hash_modifier: Option<String>,

    cardinality: Option<Cardinality>,
    optional: bool,
    destination: String,

    #[serde(skip)]
    destination_entity: Option<EntityId>,

    #[serde(skip)]
    inverse_relationship: Option<RelationshipRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    inverse_name: Option<String>,

    #[serde(skip)]
    accessor: Option<AccessorToken>,

    #[serde(skip)]
    inverse_accessor: Option<AccessorToken>,

    delete_rule: DeleteRule,

    #[serde(skip_serializing_if = "Option::is_none")]
    min_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_count: Option<usize>,

    unique: bool,

    #[serde(skip)]
    value_type: Option<ValueType>,
}

impl Relationship {
    /// A blank template for declaration-site options.
    #[must_use]
    pub fn template() -> Self {
        Self {
            id: ObjectId::next(),
            name: String::new(),
            original_name: None,
            hash_modifier: None,
            cardinality: None,
            optional: false,
            destination: String::new(),
            destination_entity: None,
            inverse_relationship: None,
            inverse_name: None,
            accessor: None,
            inverse_accessor: None,
            delete_rule: DeleteRule::default(),
            min_count: None,
            max_count: None,
            unique: false,
            value_type: None,
        }
    }

    /// Copy with a fresh identity, so one template can seed many entities.
    #[must_use]
    pub fn copy_template(&self) -> Self {
        Self {
            id: ObjectId::next(),
            ..self.clone()
        }
    }

    //
    // template builders
    //

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.set_unique(true);
        self
    }

    /// Declare the inverse explicitly by the other side's accessor token.
    #[must_use]
    pub fn inverse(mut self, token: AccessorToken) -> Self {
        self.set_inverse_accessor(Some(token));
        self
    }

    #[must_use]
    pub fn with_delete_rule(mut self, rule: DeleteRule) -> Self {
        self.set_delete_rule(rule);
        self
    }

    #[must_use]
    pub fn with_min_count(mut self, count: usize) -> Self {
        self.set_min_count(Some(count));
        self
    }

    #[must_use]
    pub fn with_max_count(mut self, count: usize) -> Self {
        self.set_max_count(Some(count));
        self
    }

    #[must_use]
    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.set_original_name(Some(name.into()));
        self
    }

    #[must_use]
    pub fn with_hash_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.set_hash_modifier(Some(modifier.into()));
        self
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
    pub const fn cardinality(&self) -> Option<Cardinality> {
        self.cardinality
    }

    #[must_use]
    pub fn is_to_many(&self) -> bool {
        self.cardinality.is_some_and(Cardinality::is_to_many)
    }

    #[must_use]
    pub fn is_to_one(&self) -> bool {
        self.cardinality == Some(Cardinality::ToOne)
    }

    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.cardinality.is_some_and(Cardinality::is_ordered)
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Destination entity name; empty until resolved.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    #[must_use]
    pub const fn destination_entity(&self) -> Option<EntityId> {
        self.destination_entity
    }

    #[must_use]
    pub const fn inverse_relationship(&self) -> Option<RelationshipRef> {
        self.inverse_relationship
    }

    #[must_use]
    pub fn inverse_name(&self) -> Option<&str> {
        self.inverse_name.as_deref()
    }

    #[must_use]
    pub const fn accessor(&self) -> Option<AccessorToken> {
        self.accessor
    }

    #[must_use]
    pub const fn inverse_accessor(&self) -> Option<AccessorToken> {
        self.inverse_accessor
    }

    #[must_use]
    pub const fn delete_rule(&self) -> DeleteRule {
        self.delete_rule
    }

    #[must_use]
    pub const fn min_count(&self) -> Option<usize> {
        self.min_count
    }

    #[must_use]
    pub const fn max_count(&self) -> Option<usize> {
        self.max_count
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    #[must_use]
    pub const fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    /// The model type targeted by this relationship, from its value type.
    #[must_use]
    pub fn target_model(&self) -> Option<ModelType> {
        self.value_type
            .as_ref()
            .and_then(|value_type| classify(value_type).model())
    }

    //
    // setters
    //

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.ensure_not_finalized();
        self.name = name.into();
    }

    pub fn set_original_name(&mut self, name: Option<String>) {
        self.ensure_not_finalized();
        self.original_name = name;
    }

    pub fn set_hash_modifier(&mut self, modifier: Option<String>) {
        self.ensure_not_finalized();
        self.hash_modifier = modifier;
    }

    pub fn set_cardinality(&mut self, cardinality: Cardinality) {
        self.ensure_not_finalized();
        self.cardinality = Some(cardinality);
    }

    pub fn set_optional(&mut self, optional: bool) {
        self.ensure_not_finalized();
        self.optional = optional;
    }

    pub fn set_destination(&mut self, name: impl Into<String>, entity: EntityId) {
        self.ensure_not_finalized();
        self.destination = name.into();
        self.destination_entity = Some(entity);
    }

    pub fn set_inverse_relationship(&mut self, inverse: Option<RelationshipRef>) {
        self.ensure_not_finalized();
        self.inverse_relationship = inverse;
    }

    pub fn set_inverse_name(&mut self, name: Option<String>) {
        self.ensure_not_finalized();
        self.inverse_name = name;
    }

    pub fn set_accessor(&mut self, token: Option<AccessorToken>) {
        self.ensure_not_finalized();
        self.accessor = token;
    }

    pub fn set_inverse_accessor(&mut self, token: Option<AccessorToken>) {
        self.ensure_not_finalized();
        self.inverse_accessor = token;
    }

    pub fn set_delete_rule(&mut self, rule: DeleteRule) {
        self.ensure_not_finalized();
        self.delete_rule = rule;
    }

    pub fn set_min_count(&mut self, count: Option<usize>) {
        self.ensure_not_finalized();
        self.min_count = count;
    }

    pub fn set_max_count(&mut self, count: Option<usize>) {
        self.ensure_not_finalized();
        self.max_count = count;
    }

    pub fn set_unique(&mut self, unique: bool) {
        self.ensure_not_finalized();
        self.unique = unique;
    }

    pub fn set_value_type(&mut self, value_type: ValueType) {
        self.ensure_not_finalized();
        self.value_type = Some(value_type);
    }
}

impl Finalizable for Relationship {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn describe(&self) -> String {
        format!("relationship '{}'", self.name)
    }
}

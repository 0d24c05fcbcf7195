use crate::{
    model::AccessorToken,
    node::{Attribute, Relationship},
    value::{SchemaValue, Value, ValueType},
};

///
/// PropertyTemplate
///
/// Pre-filled description supplied at the declaration site. Copied by the
/// entity builder, which only fills in what the template left blank.
///

#[derive(Clone, Debug)]
pub enum PropertyTemplate {
    Attribute(Attribute),
    Relationship(Relationship),
}

impl From<Attribute> for PropertyTemplate {
    fn from(attribute: Attribute) -> Self {
        Self::Attribute(attribute)
    }
}

impl From<Relationship> for PropertyTemplate {
    fn from(relationship: Relationship) -> Self {
        Self::Relationship(relationship)
    }
}

///
/// PropertyMetadata
///
/// One declared property of a model type, as produced by the
/// property-declaration collaborator.
///

#[derive(Clone, Debug)]
pub struct PropertyMetadata {
    pub name: &'static str,
    pub accessor: AccessorToken,
    pub value_type: ValueType,
    pub default_value: Option<Value>,
    pub template: Option<PropertyTemplate>,
    pub transient: bool,
}

impl PropertyMetadata {
    #[must_use]
    pub const fn new(name: &'static str, accessor: AccessorToken, value_type: ValueType) -> Self {
        Self {
            name,
            accessor,
            value_type,
            default_value: None,
            template: None,
            transient: false,
        }
    }

    /// Metadata for a property whose value type is `T`.
    #[must_use]
    pub fn of<T: SchemaValue>(name: &'static str, accessor: AccessorToken) -> Self {
        Self::new(name, accessor, T::value_type())
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<PropertyTemplate>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use]
    pub const fn transient(mut self) -> Self {
        self.transient = true;
        self
    }
}

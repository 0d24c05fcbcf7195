use crate::{
    finalize::{Finalizable, ObjectId},
    types::AttributeKind,
    value::Value,
};
use serde::Serialize;

///
/// AttributeOptions
/// Storage hints carried verbatim from the declaration site.
///

#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AttributeOptions {
    pub external_storage: bool,
    pub spotlight: bool,
    pub preserve_value_on_deletion: bool,
    pub allows_cloud_encryption: bool,
}

///
/// Attribute
///
/// Scalar-valued property of an entity. A `kind` of `None` means the
/// declaration left it blank; the entity builder fills it together with
/// `optional` from the classified value type.
///

#[derive(Clone, Debug, Serialize)]
pub struct Attribute {
    #[serde(skip)]
    id: ObjectId,
    name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    original_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    hash_modifier: Option<String>,

    kind: Option<AttributeKind>,
    optional: bool,
    unique: bool,
    transient: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    transform: Option<String>,

    options: AttributeOptions,
}

impl Attribute {
    /// A fully specified attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: AttributeKind, optional: bool) -> Self {
        let mut attribute = Self::template();
        attribute.set_name(name);
        attribute.set_kind(kind, optional);

        attribute
    }

    /// A blank template for declaration-site options.
    #[must_use]
    pub fn template() -> Self {
        Self {
            id: ObjectId::next(),
            name: String::new(),
            original_name: None,
            hash_modifier: None,
            kind: None,
            optional: false,
            unique: false,
            transient: false,
            default_value: None,
            transform: None,
            options: AttributeOptions::default(),
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

    #[must_use]
    pub fn transformable(mut self, transform: impl Into<String>) -> Self {
        self.set_transform(Some(transform.into()));
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

    #[must_use]
    pub fn with_options(mut self, options: AttributeOptions) -> Self {
        self.set_options(options);
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.set_default_value(Some(value.into()));
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
    pub const fn kind(&self) -> Option<AttributeKind> {
        self.kind
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.transient
    }

    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    #[must_use]
    pub fn transform(&self) -> Option<&str> {
        self.transform.as_deref()
    }

    #[must_use]
    pub const fn options(&self) -> AttributeOptions {
        self.options
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

    /// Kind and optionality are set together; they both derive from the value type.
    pub fn set_kind(&mut self, kind: AttributeKind, optional: bool) {
        self.ensure_not_finalized();
        self.kind = Some(kind);
        self.optional = optional;
    }

    pub fn set_optional(&mut self, optional: bool) {
        self.ensure_not_finalized();
        self.optional = optional;
    }

    pub fn set_unique(&mut self, unique: bool) {
        self.ensure_not_finalized();
        self.unique = unique;
    }

    pub fn set_default_value(&mut self, value: Option<Value>) {
        self.ensure_not_finalized();
        self.default_value = value;
    }

    pub fn set_transform(&mut self, transform: Option<String>) {
        self.ensure_not_finalized();
        self.transform = transform;
    }

    pub fn set_options(&mut self, options: AttributeOptions) {
        self.ensure_not_finalized();
        self.options = options;
    }
}

impl Finalizable for Attribute {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn describe(&self) -> String {
        format!("attribute '{}'", self.name)
    }
}

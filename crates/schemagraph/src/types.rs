use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};

///
/// AttributeKind
/// Primitive storage kind recorded on an attribute description.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum AttributeKind {
    Binary,
    Boolean,
    Date,
    Decimal,
    Double,
    Float,
    Integer16,
    Integer32,
    Integer64,
    String,
    Transformable,
    Uri,
    Uuid,
}

impl AttributeKind {
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Integer16 | Self::Integer32 | Self::Integer64)
    }

    // Includes integers, floats and Decimal.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, Self::Decimal | Self::Double | Self::Float)
    }

    /// Kinds that cannot be stored directly and go through a value transform.
    #[must_use]
    pub const fn needs_transform(self) -> bool {
        matches!(self, Self::Transformable)
    }
}

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum Cardinality {
    ToOne,
    #[display("ToMany(ordered: {ordered})")]
    ToMany {
        ordered: bool,
    },
}

impl Cardinality {
    #[must_use]
    pub const fn is_to_many(self) -> bool {
        matches!(self, Self::ToMany { .. })
    }

    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::ToMany { ordered: true })
    }
}

///
/// CollectionKind
/// Homogeneous collection shape holding the targets of a to-many relationship.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize)]
pub enum CollectionKind {
    Array,
    Set,
}

///
/// DeleteRule
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
#[remain::sorted]
pub enum DeleteRule {
    Cascade,
    Deny,
    NoAction,
    #[default]
    Nullify,
}

use crate::{
    model::{ModelType, PersistentModel},
    types::AttributeKind,
};
use derive_more::From;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_bytes::ByteBuf;
use std::{
    collections::{BTreeSet, HashSet},
    fmt::{self, Display},
    marker::PhantomData,
    time::SystemTime,
};
use url::Url;
use uuid::Uuid;

///
/// Value
/// Stored default value of a declared property.
///

#[derive(Clone, Debug, From, PartialEq, Serialize)]
pub enum Value {
    Blob(#[serde(with = "serde_bytes")] Vec<u8>),
    Bool(bool),
    Float(f64),
    Int(i64),
    List(Vec<Self>),
    Text(String),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

///
/// ValueType
///
/// Static shape of a declared property's value type. The classifier
/// decides attribute vs relationship purely from this shape.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ValueType {
    Scalar(AttributeKind),
    Model(ModelType),
    Optional(Box<Self>),
    Array(Box<Self>),
    Set(Box<Self>),
    OrderedSet(ModelType),
    /// Application-defined payload, named for diagnostics.
    Custom(&'static str),
}

impl ValueType {
    #[must_use]
    pub fn of<T: SchemaValue>() -> Self {
        T::value_type()
    }

    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    #[must_use]
    pub fn set(element: Self) -> Self {
        Self::Set(Box::new(element))
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Model(model) => write!(f, "{model}"),
            Self::Optional(inner) => write!(f, "{inner}?"),
            Self::Array(element) => write!(f, "[{element}]"),
            Self::Set(element) => write!(f, "Set<{element}>"),
            Self::OrderedSet(model) => write!(f, "OrderedSet<{model}>"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

///
/// SchemaValue
///
/// Maps a Rust field type to its declared `ValueType` shape.
///

pub trait SchemaValue {
    fn value_type() -> ValueType;
}

impl<M: PersistentModel> SchemaValue for M {
    fn value_type() -> ValueType {
        ValueType::Model(ModelType::of::<M>())
    }
}

macro_rules! impl_scalar_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl SchemaValue for $ty {
                fn value_type() -> ValueType {
                    ValueType::Scalar(AttributeKind::$kind)
                }
            }
        )*
    };
}

// narrow and unsigned widths widen to the next signed storage width
impl_scalar_value! {
    String => String,
    bool => Boolean,
    i8 => Integer16,
    i16 => Integer16,
    i32 => Integer32,
    i64 => Integer64,
    isize => Integer64,
    u8 => Integer16,
    u16 => Integer32,
    u32 => Integer64,
    u64 => Integer64,
    usize => Integer64,
    f32 => Float,
    f64 => Double,
    SystemTime => Date,
    ByteBuf => Binary,
    Decimal => Decimal,
    Url => Uri,
    Uuid => Uuid,
}

impl<T: SchemaValue> SchemaValue for Option<T> {
    fn value_type() -> ValueType {
        ValueType::optional(T::value_type())
    }
}

impl<T: SchemaValue> SchemaValue for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::array(T::value_type())
    }
}

impl<T: SchemaValue> SchemaValue for BTreeSet<T> {
    fn value_type() -> ValueType {
        ValueType::set(T::value_type())
    }
}

impl<T: SchemaValue, S> SchemaValue for HashSet<T, S> {
    fn value_type() -> ValueType {
        ValueType::set(T::value_type())
    }
}

///
/// OrderedSet
/// Marker for an ordered to-many relationship to `M`.
///

pub struct OrderedSet<M: PersistentModel>(PhantomData<M>);

impl<M: PersistentModel> SchemaValue for OrderedSet<M> {
    fn value_type() -> ValueType {
        ValueType::OrderedSet(ModelType::of::<M>())
    }
}

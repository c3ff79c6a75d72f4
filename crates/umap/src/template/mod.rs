//! Schema model: primitive, map and array templates.

mod array;
mod key;
mod map;
mod primitive;
mod validator;

use std::sync::Arc;

pub use array::ArrayTemplate;
pub use key::{is_valid_key_name, Key, Mapping};
pub use map::{MapTemplate, MapTemplateBuilder};
pub use primitive::{PrimitiveTemplate, PrimitiveType};
pub use validator::{TextValidator, Validator};

use crate::error::TemplateError;
use crate::value::Value;

/// Kind a reader is asked to produce for the next value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    Primitive(PrimitiveType),
    Map,
    Array,
}

impl ExpectedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primitive(kind) => kind.as_str(),
            Self::Map => "map",
            Self::Array => "array",
        }
    }
}

/// Immutable schema node. Cloning is cheap: nested templates are shared.
#[derive(Debug, Clone)]
pub enum Template {
    Primitive(PrimitiveTemplate),
    Map(Arc<MapTemplate>),
    Array(Arc<ArrayTemplate>),
}

impl Template {
    /// Fails for `Enum`, which needs [`Template::enumeration`].
    pub fn primitive(kind: PrimitiveType) -> Result<Self, TemplateError> {
        PrimitiveTemplate::new(kind).map(Self::Primitive)
    }

    fn plain(kind: PrimitiveType) -> Self {
        Self::Primitive(PrimitiveTemplate::unconstrained(kind))
    }

    pub fn validated(kind: PrimitiveType, validator: Validator) -> Result<Self, TemplateError> {
        PrimitiveTemplate::with_validator(kind, validator).map(Self::Primitive)
    }

    pub fn string() -> Self {
        Self::plain(PrimitiveType::String)
    }

    pub fn bool() -> Self {
        Self::plain(PrimitiveType::Bool)
    }

    pub fn byte() -> Self {
        Self::plain(PrimitiveType::Byte)
    }

    pub fn short() -> Self {
        Self::plain(PrimitiveType::Short)
    }

    pub fn int() -> Self {
        Self::plain(PrimitiveType::Int)
    }

    pub fn long() -> Self {
        Self::plain(PrimitiveType::Long)
    }

    pub fn float() -> Self {
        Self::plain(PrimitiveType::Float)
    }

    pub fn double() -> Self {
        Self::plain(PrimitiveType::Double)
    }

    pub fn char() -> Self {
        Self::plain(PrimitiveType::Char)
    }

    pub fn enumeration<I, S>(members: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrimitiveTemplate::enumeration(members).map(Self::Primitive)
    }

    /// Array template whose entries are `self`.
    pub fn as_array(self) -> Self {
        Self::Array(Arc::new(ArrayTemplate::new(self)))
    }

    /// Leaf weight used for canonical ordering: 1 per primitive, the sum of
    /// the mappings for a map, ten times the entry for an array.
    pub fn complexity(&self) -> u64 {
        match self {
            Self::Primitive(_) => 1,
            Self::Map(map) => map.complexity(),
            Self::Array(array) => array.complexity(),
        }
    }

    pub fn expected_kind(&self) -> ExpectedKind {
        match self {
            Self::Primitive(p) => ExpectedKind::Primitive(p.kind()),
            Self::Map(_) => ExpectedKind::Map,
            Self::Array(_) => ExpectedKind::Array,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.expected_kind().as_str()
    }

    pub fn as_map(&self) -> Option<&Arc<MapTemplate>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Structural match: same kinds and validators all the way down.
    pub fn matches_template(&self, other: &Template) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => Arc::ptr_eq(a, b) || a.matches(b),
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b) || a.matches(b),
            _ => false,
        }
    }

    /// Whether `value` already satisfies this template without coercion.
    pub fn matches_value(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Primitive(p), v) => p.validate(v).is_ok(),
            (Self::Map(t), Value::Map(doc)) => t.matches(doc.template()),
            (Self::Array(t), Value::Array(doc)) => t.matches(doc.template()),
            _ => false,
        }
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.matches_template(other)
    }
}

impl TryFrom<PrimitiveType> for Template {
    type Error = TemplateError;

    fn try_from(kind: PrimitiveType) -> Result<Self, Self::Error> {
        Self::primitive(kind)
    }
}

impl From<PrimitiveTemplate> for Template {
    fn from(template: PrimitiveTemplate) -> Self {
        Self::Primitive(template)
    }
}

impl From<MapTemplate> for Template {
    fn from(template: MapTemplate) -> Self {
        Self::Map(Arc::new(template))
    }
}

impl From<Arc<MapTemplate>> for Template {
    fn from(template: Arc<MapTemplate>) -> Self {
        Self::Map(template)
    }
}

impl From<ArrayTemplate> for Template {
    fn from(template: ArrayTemplate) -> Self {
        Self::Array(Arc::new(template))
    }
}

impl From<Arc<ArrayTemplate>> for Template {
    fn from(template: Arc<ArrayTemplate>) -> Self {
        Self::Array(template)
    }
}

//! Runtime values stored in documents.

use crate::document::{ArrayDocument, MapDocument};
use crate::template::PrimitiveType;

/// Longest value preview carried by a [`crate::FieldError`], in characters.
pub const PREVIEW_LIMIT: usize = 256;

/// A document value.
///
/// `Null` is the explicit-null sentinel used while building. It never ends
/// up stored in a document: absence is modelled by omitting the key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    /// Member name of an enum template.
    Enum(String),
    Map(MapDocument),
    Array(ArrayDocument),
}

impl Value {
    pub fn enumeration(member: impl Into<String>) -> Self {
        Self::Enum(member.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Primitive kind of a scalar; `None` for null, maps and arrays.
    pub fn kind(&self) -> Option<PrimitiveType> {
        Some(match self {
            Self::Bool(_) => PrimitiveType::Bool,
            Self::Byte(_) => PrimitiveType::Byte,
            Self::Short(_) => PrimitiveType::Short,
            Self::Int(_) => PrimitiveType::Int,
            Self::Long(_) => PrimitiveType::Long,
            Self::Float(_) => PrimitiveType::Float,
            Self::Double(_) => PrimitiveType::Double,
            Self::Char(_) => PrimitiveType::Char,
            Self::String(_) => PrimitiveType::String,
            Self::Enum(_) => PrimitiveType::Enum,
            Self::Null | Self::Map(_) | Self::Array(_) => return None,
        })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Map(_) => "map",
            Self::Array(_) => "array",
            other => other.kind().map_or("unknown", PrimitiveType::as_str),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer kind, widened.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(n) => Some(i64::from(*n)),
            Self::Short(n) => Some(i64::from(*n)),
            Self::Int(n) => Some(i64::from(*n)),
            Self::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Any floating kind, widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(f64::from(*n)),
            Self::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Text of a string or enum value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapDocument> {
        match self {
            Self::Map(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayDocument> {
        match self {
            Self::Array(doc) => Some(doc),
            _ => None,
        }
    }

    /// Short rendering for error messages, at most [`PREVIEW_LIMIT`] characters
    /// of text.
    pub fn preview(&self) -> String {
        match self {
            Self::Null => "[null]".to_owned(),
            Self::Map(_) => "[Map]".to_owned(),
            Self::Array(_) => "[Array]".to_owned(),
            Self::String(s) | Self::Enum(s) => {
                if s.chars().count() > PREVIEW_LIMIT {
                    let mut out: String = s.chars().take(PREVIEW_LIMIT).collect();
                    out.push_str("...");
                    out
                } else {
                    s.clone()
                }
            }
            Self::Bool(b) => b.to_string(),
            Self::Byte(n) => n.to_string(),
            Self::Short(n) => n.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Long(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Double(n) => n.to_string(),
            Self::Char(c) => c.to_string(),
        }
    }
}

/// Explicit null equals absence.
impl PartialEq<Option<Value>> for Value {
    fn eq(&self, other: &Option<Value>) -> bool {
        match other {
            None => self.is_null(),
            Some(other) => self == other,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => String,
    MapDocument => Map,
    ArrayDocument => Array,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

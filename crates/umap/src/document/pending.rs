use super::{ArrayBuilder, ArrayDocument, MapBuilder, MapDocument};
use crate::error::FieldError;
use crate::value::Value;

/// Input to a builder slot: a finished value, or a nested builder that is
/// materialized when the parent is built.
#[derive(Debug)]
pub enum Pending {
    Ready(Value),
    Map(MapBuilder),
    Array(ArrayBuilder),
}

impl Pending {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Ready(Value::Null))
    }

    pub fn preview(&self) -> String {
        match self {
            Self::Ready(value) => value.preview(),
            Self::Map(_) => "[Map]".to_owned(),
            Self::Array(_) => "[Array]".to_owned(),
        }
    }

    pub(crate) fn resolve(self) -> Result<Value, FieldError> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Map(builder) => builder.build().map(Value::Map),
            Self::Array(builder) => builder.build().map(Value::Array),
        }
    }
}

impl From<MapBuilder> for Pending {
    fn from(builder: MapBuilder) -> Self {
        Self::Map(builder)
    }
}

impl From<ArrayBuilder> for Pending {
    fn from(builder: ArrayBuilder) -> Self {
        Self::Array(builder)
    }
}

macro_rules! pending_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Pending {
                fn from(v: $ty) -> Self {
                    Pending::Ready(Value::from(v))
                }
            }
        )*
    };
}

pending_from_value!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    f32,
    f64,
    char,
    String,
    &str,
    MapDocument,
    ArrayDocument,
);

impl<T: Into<Value>> From<Option<T>> for Pending {
    fn from(v: Option<T>) -> Self {
        Pending::Ready(v.map_or(Value::Null, Into::into))
    }
}

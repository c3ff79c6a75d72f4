//! Immutable documents and the builders that validate them.

mod array;
mod map;
mod pending;

pub use array::{ArrayBuilder, ArrayDocument};
pub use map::{MapBuilder, MapDocument};
pub use pending::Pending;

use crate::coerce::coerce;
use crate::error::{FieldError, FieldPath, Reason};
use crate::template::Template;
use crate::value::Value;

/// Checks a non-null input against `template`, coercing primitives.
/// Nested builders are only checked structurally; they resolve at build time.
fn admit(pending: Pending, template: &Template) -> Result<Pending, FieldError> {
    match (pending, template) {
        (Pending::Ready(value), Template::Primitive(p)) => coerce(value, p).map(Pending::Ready),
        (Pending::Ready(Value::Map(doc)), Template::Map(t)) if t.matches(doc.template()) => {
            Ok(Pending::Ready(Value::Map(doc)))
        }
        (Pending::Ready(Value::Array(doc)), Template::Array(t)) if t.matches(doc.template()) => {
            Ok(Pending::Ready(Value::Array(doc)))
        }
        (Pending::Map(builder), Template::Map(t)) if t.matches(builder.template()) => {
            Ok(Pending::Map(builder))
        }
        (Pending::Array(builder), Template::Array(t)) if t.matches(builder.template()) => {
            Ok(Pending::Array(builder))
        }
        (pending, template) => Err(FieldError::bare(FieldPath::root(), Reason::ValueTypeMismatch)
            .with_preview(pending.preview())
            .with_details(format!(
                "expected a {} matching the declared template",
                template.type_name()
            ))),
    }
}

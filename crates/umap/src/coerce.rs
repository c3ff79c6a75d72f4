//! Lenient conversion of input values into a template's declared kind.
//!
//! An exact kind is accepted as is. Text that is already an enum member or
//! a single character is kept verbatim; other strings are stripped of all
//! whitespace and parsed. Numbers convert between kinds only when the value
//! survives the conversion unchanged. The validator always runs last.

use crate::error::{FieldError, FieldPath, Reason};
use crate::template::{PrimitiveTemplate, PrimitiveType};
use crate::value::Value;

/// Coerces `value` into `template`'s kind. Errors carry a root path; callers
/// re-root them under the field being assigned.
pub fn coerce(value: Value, template: &PrimitiveTemplate) -> Result<Value, FieldError> {
    let target = template.kind();
    let non_finite = match &value {
        Value::Float(f) => !f.is_finite(),
        Value::Double(f) => !f.is_finite(),
        _ => false,
    };
    if non_finite {
        return Err(mismatch(&value, target).with_details("non-finite floating value"));
    }

    let coerced = if value.kind() == Some(target) {
        value
    } else if let Value::String(raw) = &value {
        if let Some(exact) = exact_text(raw, template) {
            exact
        } else {
            let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            if target == PrimitiveType::Enum {
                let members = template.members().unwrap_or_default();
                if !members.iter().any(|m| *m == stripped) {
                    return Err(FieldError::new(
                        FieldPath::root(),
                        Reason::InvalidValue,
                        Some(&value),
                    )
                    .with_details(format!("not one of [{}]", members.join(", "))));
                }
                Value::Enum(stripped)
            } else {
                parse_text(&stripped, target).ok_or_else(|| mismatch(&value, target))?
            }
        }
    } else {
        convert(&value, target).ok_or_else(|| mismatch(&value, target))?
    };

    template.validate(&coerced).map_err(|details| {
        FieldError::new(FieldPath::root(), Reason::InvalidValue, Some(&coerced))
            .with_details(details)
    })?;
    Ok(coerced)
}

fn mismatch(value: &Value, target: PrimitiveType) -> FieldError {
    FieldError::new(FieldPath::root(), Reason::ValueTypeMismatch, Some(value))
        .with_details(format!("expected type {target}"))
}

/// Text that already is a declared enum member or a single BMP character
/// is taken verbatim, whitespace included.
fn exact_text(raw: &str, template: &PrimitiveTemplate) -> Option<Value> {
    match template.kind() {
        PrimitiveType::Enum => template
            .members()?
            .iter()
            .any(|m| m == raw)
            .then(|| Value::Enum(raw.to_owned())),
        PrimitiveType::Char => {
            let mut chars = raw.chars();
            let c = chars.next()?;
            (chars.next().is_none() && u32::from(c) <= 0xFFFF).then_some(Value::Char(c))
        }
        _ => None,
    }
}

fn parse_text(s: &str, target: PrimitiveType) -> Option<Value> {
    Some(match target {
        PrimitiveType::String => Value::String(s.to_owned()),
        PrimitiveType::Bool => {
            if s.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if s.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                return None;
            }
        }
        PrimitiveType::Byte => Value::Byte(s.parse().ok()?),
        PrimitiveType::Short => Value::Short(s.parse().ok()?),
        PrimitiveType::Int => Value::Int(s.parse().ok()?),
        PrimitiveType::Long => Value::Long(s.parse().ok()?),
        PrimitiveType::Float => Value::Float(finite_f32(s.parse().ok()?)?),
        PrimitiveType::Double => Value::Double(finite_f64(s.parse().ok()?)?),
        PrimitiveType::Char => {
            let mut chars = s.chars();
            let c = chars.next()?;
            if chars.next().is_some() || u32::from(c) > 0xFFFF {
                return None;
            }
            Value::Char(c)
        }
        PrimitiveType::Enum => return None,
    })
}

enum Number {
    Int(i64),
    Float(f64),
}

fn number(value: &Value) -> Option<Number> {
    if let Some(n) = value.as_i64() {
        return Some(Number::Int(n));
    }
    value.as_f64().map(Number::Float)
}

fn integral(n: Number) -> Option<i64> {
    match n {
        Number::Int(i) => Some(i),
        // 2^63 is the first float past i64::MAX.
        Number::Float(f)
            if f.fract() == 0.0
                && f >= -9.223_372_036_854_776e18
                && f < 9.223_372_036_854_776e18 =>
        {
            Some(f as i64)
        }
        Number::Float(_) => None,
    }
}

fn convert(value: &Value, target: PrimitiveType) -> Option<Value> {
    match target {
        PrimitiveType::Byte => Some(Value::Byte(i8::try_from(integral(number(value)?)?).ok()?)),
        PrimitiveType::Short => Some(Value::Short(i16::try_from(integral(number(value)?)?).ok()?)),
        PrimitiveType::Int => Some(Value::Int(i32::try_from(integral(number(value)?)?).ok()?)),
        PrimitiveType::Long => Some(Value::Long(integral(number(value)?)?)),
        PrimitiveType::Float => {
            let f = match number(value)? {
                Number::Int(i) => i as f32,
                Number::Float(f) => f as f32,
            };
            finite_f32(f).map(Value::Float)
        }
        PrimitiveType::Double => Some(Value::Double(match number(value)? {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        })),
        PrimitiveType::Bool => Some(Value::Bool(match number(value)? {
            Number::Int(i) => i != 0,
            Number::Float(f) => f != 0.0,
        })),
        PrimitiveType::Char => {
            let code = u32::try_from(integral(number(value)?)?).ok()?;
            if code > 0xFFFF {
                return None;
            }
            char::from_u32(code).map(Value::Char)
        }
        PrimitiveType::String => match value {
            Value::Enum(s) => Some(Value::String(s.clone())),
            _ => None,
        },
        PrimitiveType::Enum => None,
    }
}

fn finite_f32(f: f32) -> Option<f32> {
    f.is_finite().then_some(f)
}

fn finite_f64(f: f64) -> Option<f64> {
    f.is_finite().then_some(f)
}

use std::fmt;

use super::validator::{TextValidator, Validator};
use crate::error::TemplateError;
use crate::value::Value;

/// The closed set of scalar kinds a template can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Bool,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    Float,
    Double,
    /// A single Basic Multilingual Plane character.
    Char,
    /// A string restricted to a declared member list.
    Enum,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 10] = [
        Self::String,
        Self::Bool,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Char,
        Self::Enum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::Enum => "enum",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    pub fn is_text(self) -> bool {
        matches!(self, Self::String | Self::Enum)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar template: declared kind plus an optional validator.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveTemplate {
    kind: PrimitiveType,
    validator: Option<Validator>,
}

impl PrimitiveTemplate {
    /// Unconstrained template. Enums need members and are built with
    /// [`PrimitiveTemplate::enumeration`].
    pub fn new(kind: PrimitiveType) -> Result<Self, TemplateError> {
        if kind == PrimitiveType::Enum {
            return Err(TemplateError::EmptyEnum);
        }
        Ok(Self::unconstrained(kind))
    }

    /// Callers guarantee `kind` is not `Enum`.
    pub(crate) fn unconstrained(kind: PrimitiveType) -> Self {
        Self {
            kind,
            validator: None,
        }
    }

    pub fn with_validator(
        kind: PrimitiveType,
        validator: Validator,
    ) -> Result<Self, TemplateError> {
        if !validator.applies_to(kind) {
            return Err(TemplateError::IncompatibleValidator {
                validator: validator.family(),
                kind: kind.as_str(),
            });
        }
        if kind == PrimitiveType::Enum {
            match &validator {
                Validator::Text(text) if text.members().is_some_and(|m| !m.is_empty()) => {}
                _ => return Err(TemplateError::EmptyEnum),
            }
        }
        Ok(Self {
            kind,
            validator: Some(validator),
        })
    }

    /// Enum template accepting exactly `members` (case-sensitive).
    pub fn enumeration<I, S>(members: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_validator(
            PrimitiveType::Enum,
            Validator::Text(TextValidator::new().one_of(members)),
        )
    }

    pub fn kind(&self) -> PrimitiveType {
        self.kind
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Declared enum members, if any.
    pub fn members(&self) -> Option<&[String]> {
        match &self.validator {
            Some(Validator::Text(text)) if self.kind == PrimitiveType::Enum => text.members(),
            _ => None,
        }
    }

    /// Checks that `value` has exactly the declared kind and passes the validator.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if value.kind() != Some(self.kind) {
            return Err(format!(
                "expected type {}, found {}",
                self.kind,
                value.type_name()
            ));
        }
        match value {
            Value::Float(f) if !f.is_finite() => return Err("non-finite float".to_owned()),
            Value::Double(f) if !f.is_finite() => return Err("non-finite double".to_owned()),
            Value::Char(c) if u32::from(*c) > 0xFFFF => {
                return Err(format!("character U+{:X} is outside the BMP", u32::from(*c)))
            }
            Value::Enum(_) if self.members().is_none() => {
                return Err("enum declares no members".to_owned())
            }
            _ => {}
        }
        match &self.validator {
            Some(validator) => validator.validate(value),
            None => Ok(()),
        }
    }
}

//! Error types shared by templates, documents and codecs.

use std::fmt;

use crate::value::Value;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    MissingKey,
    DuplicatedKey,
    MissingValue,
    UnknownKey,
    ValueTypeMismatch,
    InvalidValue,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingKey => "MISSING_KEY",
            Self::DuplicatedKey => "DUPLICATED_KEY",
            Self::MissingValue => "MISSING_VALUE",
            Self::UnknownKey => "UNKNOWN_KEY",
            Self::ValueTypeMismatch => "VALUE_TYPE_MISMATCH",
            Self::InvalidValue => "INVALID_VALUE",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a field inside a nested document, rendered as `a.b[2].c`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.into())],
        }
    }

    pub fn index(index: usize) -> Self {
        Self {
            segments: vec![PathSegment::Index(index)],
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the path re-rooted under `parent`.
    pub fn under(mut self, parent: PathSegment) -> Self {
        self.segments.insert(0, parent);
        self
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(name) if i == 0 => f.write_str(name)?,
                PathSegment::Key(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A field that failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Field: {path}; Reason: {reason}; Value: {value}; Details: {};",
    .details.as_deref().unwrap_or("none")
)]
pub struct FieldError {
    pub path: FieldPath,
    pub reason: Reason,
    /// Bounded preview of the offending value.
    pub value: String,
    pub details: Option<String>,
}

impl FieldError {
    pub fn new(path: FieldPath, reason: Reason, value: Option<&Value>) -> Self {
        Self {
            path,
            reason,
            value: value.map_or_else(|| Value::Null.preview(), Value::preview),
            details: None,
        }
    }

    /// Error with no value attached, e.g. a missing key.
    pub fn bare(path: FieldPath, reason: Reason) -> Self {
        Self::new(path, reason, None)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_preview(mut self, preview: String) -> Self {
        self.value = preview;
        self
    }

    pub fn under(mut self, parent: PathSegment) -> Self {
        self.path = self.path.under(parent);
        self
    }
}

/// Schema construction failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("invalid key name: {0:?}")]
    InvalidKey(String),
    #[error("duplicate mapping for key {0:?}")]
    DuplicateMapping(String),
    #[error("default value of {key:?} does not match its template")]
    DefaultMismatch { key: String },
    #[error("{validator} validator cannot apply to {kind} values")]
    IncompatibleValidator {
        validator: &'static str,
        kind: &'static str,
    },
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("enum template declares no members")]
    EmptyEnum,
}

/// Misuse of a document accessor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("unknown key {0:?}")]
    UnknownKey(String),
    #[error("key {0:?} is optional")]
    Optional(String),
    #[error("key {0:?} is required")]
    Required(String),
    #[error("required key {0:?} holds no value")]
    Missing(String),
}

/// Malformed input at the format level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}{}", .position.map(|p| format!(" at offset {p}")).unwrap_or_default())]
pub struct FormatError {
    pub message: String,
    pub position: Option<usize>,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    pub fn at(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn end_of_input() -> Self {
        Self::new("unexpected end of input")
    }
}

/// Failure of an encode or decode pass.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("internal codec error: {0}")]
    Internal(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Re-roots field errors under `parent`; other variants pass through.
    pub fn under(self, parent: PathSegment) -> Self {
        match self {
            Self::Field(err) => Self::Field(err.under(parent)),
            other => other,
        }
    }

    pub fn field(&self) -> Option<&FieldError> {
        match self {
            Self::Field(err) => Some(err),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<Reason> {
        self.field().map(|err| err.reason)
    }
}

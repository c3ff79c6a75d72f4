//! Schema-driven immutable documents.
//!
//! A [`MapTemplate`] describes the shape of a document: named mappings with a
//! primitive, map or array template, optionality, detail level and default.
//! Documents are assembled through validating builders ([`MapBuilder`],
//! [`ArrayBuilder`]) that coerce loosely-typed input into the declared types.
//!
//! The [`codec`] module defines a small token protocol ([`codec::Format`],
//! [`codec::FormatReader`], [`codec::FormatWriter`]) and one generic recursive
//! algorithm that streams documents through any format implementing it.

pub mod codec;
pub mod coerce;
pub mod document;
pub mod error;
pub mod template;
pub mod value;

pub use document::{ArrayBuilder, ArrayDocument, MapBuilder, MapDocument, Pending};
pub use error::{
    AccessError, CodecError, FieldError, FieldPath, FormatError, PathSegment, Reason,
    TemplateError,
};
pub use template::{
    ArrayTemplate, ExpectedKind, Key, MapTemplate, MapTemplateBuilder, Mapping, PrimitiveTemplate,
    PrimitiveType, Template, TextValidator, Validator,
};
pub use value::Value;

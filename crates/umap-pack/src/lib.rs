//! Wire formats for umap documents.
//!
//! - [`binary::BinaryFormat`]: compact, schema-implied layout with no field
//!   names or delimiters.
//! - [`json::JsonFormat`]: standard JSON text, compact or pretty.

pub mod binary;
pub mod json;
mod text;

pub use binary::BinaryFormat;
pub use json::JsonFormat;

use umap::codec::Format;

/// Every built-in format.
pub fn formats() -> [&'static dyn Format; 2] {
    [&BinaryFormat, &JsonFormat]
}

/// Built-in format for a file extension, with or without the leading dot.
pub fn by_extension(extension: &str) -> Option<&'static dyn Format> {
    let extension = extension.trim_start_matches('.');
    formats().into_iter().find(|format| {
        format
            .extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    })
}

pub fn by_mime_type(mime_type: &str) -> Option<&'static dyn Format> {
    formats()
        .into_iter()
        .find(|format| format.mime_type().eq_ignore_ascii_case(mime_type))
}

//! Format-independent streaming codec.
//!
//! A [`Format`] hands out a [`FormatReader`] and a [`FormatWriter`] per pass.
//! [`decode::read_document`] and [`encode::write_document`] walk the template
//! and drive those through a fixed token protocol, so every format gets the
//! same validation, coercion, optional/default and nesting rules.

pub mod decode;
pub mod encode;
mod context;
mod format;
mod options;
mod token;

use std::io::{Read, Write};
use std::sync::Arc;

pub use context::{Frame, ReadContext, WriteContext};
pub use format::{Format, FormatReader, FormatWriter, MappingSlot};
pub use options::{Encoding, ReaderOptions, WriterOptions};
pub use token::{Token, ValueToken};

use crate::document::MapDocument;
use crate::error::CodecError;
use crate::template::MapTemplate;

/// Decodes a document of `template` from `input`.
pub fn decode_from(
    input: &mut dyn Read,
    template: &Arc<MapTemplate>,
    format: &dyn Format,
    options: &ReaderOptions,
) -> Result<MapDocument, CodecError> {
    tracing::debug!(format = format.name(), mappings = template.len(), "decode pass");
    let mut reader = format.create_reader(input, options);
    decode::read_document(reader.as_mut(), template, options)
}

pub fn decode_slice(
    bytes: &[u8],
    template: &Arc<MapTemplate>,
    format: &dyn Format,
    options: &ReaderOptions,
) -> Result<MapDocument, CodecError> {
    let mut input = bytes;
    decode_from(&mut input, template, format, options)
}

/// Decodes text, first encoding it with the pass encoding.
pub fn decode_str(
    text: &str,
    template: &Arc<MapTemplate>,
    format: &dyn Format,
    options: &ReaderOptions,
) -> Result<MapDocument, CodecError> {
    let bytes = options.encoding.encode(text);
    decode_slice(&bytes, template, format, options)
}

impl MapDocument {
    /// Encodes the mappings up to `detail_level` into `output`.
    pub fn encode_to(
        &self,
        output: &mut dyn Write,
        format: &dyn Format,
        options: &WriterOptions,
        detail_level: u32,
    ) -> Result<(), CodecError> {
        tracing::debug!(format = format.name(), detail_level, "encode pass");
        let mut writer = format.create_writer(output, options);
        encode::write_document(writer.as_mut(), self, options, detail_level)
    }

    pub fn encode_to_vec(
        &self,
        format: &dyn Format,
        options: &WriterOptions,
        detail_level: u32,
    ) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        self.encode_to(&mut out, format, options, detail_level)?;
        Ok(out)
    }

    /// Encodes and decodes the bytes back to text with the pass encoding.
    pub fn encode_to_string(
        &self,
        format: &dyn Format,
        options: &WriterOptions,
        detail_level: u32,
    ) -> Result<String, CodecError> {
        let bytes = self.encode_to_vec(format, options, detail_level)?;
        Ok(options.encoding.decode(&bytes)?)
    }
}

//! Compact binary format.
//!
//! Layout is implied entirely by the template, so reader and writer must use
//! the exact same schema:
//! - integers are big-endian at their declared width (1, 2, 4 or 8 bytes);
//! - `char` is one big-endian UTF-16 code unit, `bool` one byte;
//! - floats are their IEEE-754 bits written as integers;
//! - strings and enum members are a 4-byte big-endian byte length followed
//!   by the text in the pass encoding;
//! - optional mappings start with a presence byte (`0` absent, `1` present);
//!   array entries never do;
//! - arrays are a 4-byte big-endian count followed by the entries.
//!
//! There is no header, field name or delimiter.

mod reader;
mod writer;

use std::io::{Read, Write};

use umap::codec::{Format, FormatReader, FormatWriter, ReaderOptions, WriterOptions};

pub use reader::BinaryReader;
pub use writer::BinaryWriter;

pub const NAME: &str = "UMap Binary";
pub const MIME_TYPE: &str = "application/umap-binary";
pub const EXTENSIONS: &[&str] = &["ubin"];

/// Presence byte of an absent optional mapping.
pub const PREFIX_NULL: u8 = 0;
/// Presence byte of a present optional mapping.
pub const PREFIX_VALUE: u8 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryFormat;

impl Format for BinaryFormat {
    fn name(&self) -> &str {
        NAME
    }

    fn extensions(&self) -> &[&str] {
        EXTENSIONS
    }

    fn mime_type(&self) -> &str {
        MIME_TYPE
    }

    fn create_reader<'a>(
        &self,
        input: &'a mut dyn Read,
        options: &ReaderOptions,
    ) -> Box<dyn FormatReader + 'a> {
        Box::new(BinaryReader::new(input, options.encoding))
    }

    fn create_writer<'a>(
        &self,
        output: &'a mut dyn Write,
        options: &WriterOptions,
    ) -> Box<dyn FormatWriter + 'a> {
        Box::new(BinaryWriter::new(output, options.encoding))
    }
}

//! JSON format.
//!
//! Documents are JSON objects keyed by mapping name. Absent optional
//! mappings are written as `null`; on input a missing key and a `null`
//! value mean the same thing. `char` and enum values travel as strings.

mod escape;
mod reader;
mod writer;

use std::io::{Read, Write};

use umap::codec::{Format, FormatReader, FormatWriter, ReaderOptions, WriterOptions};

pub use reader::JsonReader;
pub use writer::JsonWriter;

pub const NAME: &str = "JSON";
pub const MIME_TYPE: &str = "application/json";
pub const EXTENSIONS: &[&str] = &["json"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonFormat;

impl Format for JsonFormat {
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
        Box::new(JsonReader::new(input, options.encoding))
    }

    fn create_writer<'a>(
        &self,
        output: &'a mut dyn Write,
        options: &WriterOptions,
    ) -> Box<dyn FormatWriter + 'a> {
        Box::new(JsonWriter::new(output, options.encoding))
    }
}

use std::io::{Read, Write};

use super::context::{ReadContext, WriteContext};
use super::options::{ReaderOptions, WriterOptions};
use super::token::ValueToken;
use crate::error::{CodecError, FormatError};
use crate::template::ExpectedKind;
use crate::value::Value;

/// A wire format: metadata plus a reader and a writer for one pass.
pub trait Format: Send + Sync {
    fn name(&self) -> &str;

    /// File extensions without the leading dot.
    fn extensions(&self) -> &[&str];

    fn mime_type(&self) -> &str;

    fn create_reader<'a>(
        &self,
        input: &'a mut dyn Read,
        options: &ReaderOptions,
    ) -> Box<dyn FormatReader + 'a>;

    fn create_writer<'a>(
        &self,
        output: &'a mut dyn Write,
        options: &WriterOptions,
    ) -> Box<dyn FormatWriter + 'a>;
}

/// Token source driven by the generic decode algorithm.
pub trait FormatReader {
    fn read_root_start(&mut self, ctx: &mut ReadContext) -> Result<(), CodecError>;

    /// Key of the next map entry, or `None` at the end of the map.
    /// `expected` is the key the document builder wants next; formats
    /// without field names return it as is.
    fn next_key_token(
        &mut self,
        ctx: &mut ReadContext,
        expected: &str,
    ) -> Result<Option<String>, CodecError>;

    /// Next value. `key` is `None` inside arrays.
    fn next_value_token(
        &mut self,
        ctx: &mut ReadContext,
        key: Option<&str>,
        expected: ExpectedKind,
        optional: bool,
        in_array: bool,
    ) -> Result<ValueToken, CodecError>;

    /// Skips the value of a key the template does not declare.
    fn skip_value(&mut self, _ctx: &mut ReadContext, key: &str) -> Result<(), CodecError> {
        Err(FormatError::new(format!("cannot skip the value of undeclared key {key:?}")).into())
    }

    /// Called when every declared key of a map was read before the reader
    /// signalled the end of the map.
    fn read_map_end(&mut self, _ctx: &mut ReadContext) -> Result<(), CodecError> {
        Ok(())
    }

    fn read_root_end(&mut self, ctx: &mut ReadContext) -> Result<(), CodecError>;
}

/// Position of a mapping being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSlot<'a> {
    pub key: &'a str,
    pub optional: bool,
    /// Whether a value (stored or default) follows.
    pub assigned: bool,
    pub index: usize,
    pub last: bool,
}

/// Token sink driven by the generic encode algorithm.
pub trait FormatWriter {
    fn write_root_start(&mut self, ctx: &WriteContext) -> Result<(), CodecError>;
    fn write_root_end(&mut self, ctx: &WriteContext) -> Result<(), CodecError>;

    fn write_map_start(&mut self, ctx: &WriteContext) -> Result<(), CodecError>;
    fn write_map_end(&mut self, ctx: &WriteContext) -> Result<(), CodecError>;
    fn write_array_start(&mut self, ctx: &WriteContext, len: usize) -> Result<(), CodecError>;
    fn write_array_end(&mut self, ctx: &WriteContext, len: usize) -> Result<(), CodecError>;

    fn write_mapping_prefix(
        &mut self,
        ctx: &WriteContext,
        slot: &MappingSlot<'_>,
    ) -> Result<(), CodecError>;
    fn write_mapping_suffix(
        &mut self,
        ctx: &WriteContext,
        slot: &MappingSlot<'_>,
    ) -> Result<(), CodecError>;
    fn write_entry_prefix(
        &mut self,
        ctx: &WriteContext,
        index: usize,
        last: bool,
    ) -> Result<(), CodecError>;
    fn write_entry_suffix(
        &mut self,
        ctx: &WriteContext,
        index: usize,
        last: bool,
    ) -> Result<(), CodecError>;

    fn write_string(&mut self, ctx: &WriteContext, value: &str) -> Result<(), CodecError>;
    fn write_bool(&mut self, ctx: &WriteContext, value: bool) -> Result<(), CodecError>;
    fn write_byte(&mut self, ctx: &WriteContext, value: i8) -> Result<(), CodecError>;
    fn write_short(&mut self, ctx: &WriteContext, value: i16) -> Result<(), CodecError>;
    fn write_int(&mut self, ctx: &WriteContext, value: i32) -> Result<(), CodecError>;
    fn write_long(&mut self, ctx: &WriteContext, value: i64) -> Result<(), CodecError>;
    fn write_float(&mut self, ctx: &WriteContext, value: f32) -> Result<(), CodecError>;
    fn write_double(&mut self, ctx: &WriteContext, value: f64) -> Result<(), CodecError>;
    fn write_char(&mut self, ctx: &WriteContext, value: char) -> Result<(), CodecError>;
    fn write_null(&mut self, ctx: &WriteContext) -> Result<(), CodecError>;

    fn write_enum(&mut self, ctx: &WriteContext, member: &str) -> Result<(), CodecError> {
        self.write_string(ctx, member)
    }

    /// Dispatches a scalar to its typed writer.
    fn write_primitive(&mut self, ctx: &WriteContext, value: &Value) -> Result<(), CodecError> {
        match value {
            Value::Null => self.write_null(ctx),
            Value::Bool(v) => self.write_bool(ctx, *v),
            Value::Byte(v) => self.write_byte(ctx, *v),
            Value::Short(v) => self.write_short(ctx, *v),
            Value::Int(v) => self.write_int(ctx, *v),
            Value::Long(v) => self.write_long(ctx, *v),
            Value::Float(v) => self.write_float(ctx, *v),
            Value::Double(v) => self.write_double(ctx, *v),
            Value::Char(v) => self.write_char(ctx, *v),
            Value::String(v) => self.write_string(ctx, v),
            Value::Enum(v) => self.write_enum(ctx, v),
            Value::Map(_) | Value::Array(_) => Err(CodecError::Internal(format!(
                "{} is not a primitive",
                value.type_name()
            ))),
        }
    }

    fn flush(&mut self) -> Result<(), CodecError>;
}

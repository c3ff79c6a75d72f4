use std::fmt::Display;
use std::io::Write;

use umap::codec::{Encoding, FormatWriter, MappingSlot, WriteContext};
use umap::CodecError;

use super::escape::write_quoted;
use crate::text::TextSink;

pub struct JsonWriter<'a> {
    sink: TextSink<'a>,
}

impl<'a> JsonWriter<'a> {
    pub fn new(out: &'a mut dyn Write, encoding: Encoding) -> Self {
        Self {
            sink: TextSink::new(out, encoding),
        }
    }

    fn number(&mut self, n: impl Display) -> Result<(), CodecError> {
        self.sink.put(&n.to_string())
    }

    /// Non-finite floats have no JSON literal and go out as strings.
    fn non_finite(&mut self, value: f64) -> Result<(), CodecError> {
        let text = if value.is_nan() {
            "NaN"
        } else if value > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        write_quoted(&mut self.sink, text)
    }

    fn entry_start(&mut self, ctx: &WriteContext) -> Result<(), CodecError> {
        if ctx.options().pretty {
            self.sink.put("\n")?;
            self.sink.spaces(ctx.indentation())?;
        }
        Ok(())
    }

    fn entry_end(&mut self, ctx: &WriteContext, last: bool) -> Result<(), CodecError> {
        if !last {
            self.sink.put(",")
        } else if ctx.options().pretty {
            self.sink.put("\n")
        } else {
            Ok(())
        }
    }

    fn close(&mut self, ctx: &WriteContext, len: usize, bracket: &str) -> Result<(), CodecError> {
        if ctx.options().pretty && len > 0 {
            self.sink.spaces(ctx.indentation())?;
        }
        self.sink.put(bracket)
    }
}

impl FormatWriter for JsonWriter<'_> {
    fn write_root_start(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_root_end(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_map_start(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        self.sink.put("{")
    }

    fn write_map_end(&mut self, ctx: &WriteContext) -> Result<(), CodecError> {
        let len = ctx.entry_count().unwrap_or(0);
        self.close(ctx, len, "}")
    }

    fn write_array_start(&mut self, _ctx: &WriteContext, _len: usize) -> Result<(), CodecError> {
        self.sink.put("[")
    }

    fn write_array_end(&mut self, ctx: &WriteContext, len: usize) -> Result<(), CodecError> {
        self.close(ctx, len, "]")
    }

    fn write_mapping_prefix(
        &mut self,
        ctx: &WriteContext,
        slot: &MappingSlot<'_>,
    ) -> Result<(), CodecError> {
        self.entry_start(ctx)?;
        write_quoted(&mut self.sink, slot.key)?;
        self.sink.put(":")?;
        let options = ctx.options();
        if options.pretty {
            self.sink.put(" ")?;
            if options.align_values {
                let width = slot.key.chars().count();
                self.sink.spaces(ctx.max_key_width().saturating_sub(width))?;
            }
        }
        Ok(())
    }

    fn write_mapping_suffix(
        &mut self,
        ctx: &WriteContext,
        slot: &MappingSlot<'_>,
    ) -> Result<(), CodecError> {
        self.entry_end(ctx, slot.last)
    }

    fn write_entry_prefix(
        &mut self,
        ctx: &WriteContext,
        _index: usize,
        _last: bool,
    ) -> Result<(), CodecError> {
        self.entry_start(ctx)
    }

    fn write_entry_suffix(
        &mut self,
        ctx: &WriteContext,
        _index: usize,
        last: bool,
    ) -> Result<(), CodecError> {
        self.entry_end(ctx, last)
    }

    fn write_string(&mut self, _ctx: &WriteContext, value: &str) -> Result<(), CodecError> {
        write_quoted(&mut self.sink, value)
    }

    fn write_bool(&mut self, _ctx: &WriteContext, value: bool) -> Result<(), CodecError> {
        self.sink.put(if value { "true" } else { "false" })
    }

    fn write_byte(&mut self, _ctx: &WriteContext, value: i8) -> Result<(), CodecError> {
        self.number(value)
    }

    fn write_short(&mut self, _ctx: &WriteContext, value: i16) -> Result<(), CodecError> {
        self.number(value)
    }

    fn write_int(&mut self, _ctx: &WriteContext, value: i32) -> Result<(), CodecError> {
        self.number(value)
    }

    fn write_long(&mut self, _ctx: &WriteContext, value: i64) -> Result<(), CodecError> {
        self.number(value)
    }

    fn write_float(&mut self, _ctx: &WriteContext, value: f32) -> Result<(), CodecError> {
        if value.is_finite() {
            self.number(value)
        } else {
            self.non_finite(f64::from(value))
        }
    }

    fn write_double(&mut self, _ctx: &WriteContext, value: f64) -> Result<(), CodecError> {
        if value.is_finite() {
            self.number(value)
        } else {
            self.non_finite(value)
        }
    }

    fn write_char(&mut self, _ctx: &WriteContext, value: char) -> Result<(), CodecError> {
        let mut buf = [0u8; 4];
        write_quoted(&mut self.sink, value.encode_utf8(&mut buf))
    }

    fn write_null(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        self.sink.put("null")
    }

    fn flush(&mut self) -> Result<(), CodecError> {
        self.sink.flush()
    }
}

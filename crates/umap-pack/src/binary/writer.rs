use std::io::Write;

use umap::codec::{Encoding, FormatWriter, MappingSlot, WriteContext};
use umap::{CodecError, FormatError};

use super::{PREFIX_NULL, PREFIX_VALUE};

pub struct BinaryWriter<'a> {
    out: &'a mut dyn Write,
    encoding: Encoding,
}

impl<'a> BinaryWriter<'a> {
    pub fn new(out: &'a mut dyn Write, encoding: Encoding) -> Self {
        Self { out, encoding }
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.out.write_all(bytes)?;
        Ok(())
    }

    fn put_len(&mut self, len: usize) -> Result<(), CodecError> {
        let len = u32::try_from(len)
            .map_err(|_| FormatError::new(format!("length {len} does not fit in 4 bytes")))?;
        self.put(&len.to_be_bytes())
    }
}

impl FormatWriter for BinaryWriter<'_> {
    fn write_root_start(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_root_end(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_map_start(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_map_end(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_array_start(&mut self, _ctx: &WriteContext, len: usize) -> Result<(), CodecError> {
        self.put_len(len)
    }

    fn write_array_end(&mut self, _ctx: &WriteContext, _len: usize) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_mapping_prefix(
        &mut self,
        _ctx: &WriteContext,
        slot: &MappingSlot<'_>,
    ) -> Result<(), CodecError> {
        if slot.optional {
            let flag = if slot.assigned { PREFIX_VALUE } else { PREFIX_NULL };
            self.put(&[flag])?;
        }
        Ok(())
    }

    fn write_mapping_suffix(
        &mut self,
        _ctx: &WriteContext,
        _slot: &MappingSlot<'_>,
    ) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_entry_prefix(
        &mut self,
        _ctx: &WriteContext,
        _index: usize,
        _last: bool,
    ) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_entry_suffix(
        &mut self,
        _ctx: &WriteContext,
        _index: usize,
        _last: bool,
    ) -> Result<(), CodecError> {
        Ok(())
    }

    fn write_string(&mut self, _ctx: &WriteContext, value: &str) -> Result<(), CodecError> {
        let encoded = self.encoding.encode(value);
        self.put_len(encoded.len())?;
        self.put(&encoded)
    }

    fn write_bool(&mut self, _ctx: &WriteContext, value: bool) -> Result<(), CodecError> {
        self.put(&[u8::from(value)])
    }

    fn write_byte(&mut self, _ctx: &WriteContext, value: i8) -> Result<(), CodecError> {
        self.put(&value.to_be_bytes())
    }

    fn write_short(&mut self, _ctx: &WriteContext, value: i16) -> Result<(), CodecError> {
        self.put(&value.to_be_bytes())
    }

    fn write_int(&mut self, _ctx: &WriteContext, value: i32) -> Result<(), CodecError> {
        self.put(&value.to_be_bytes())
    }

    fn write_long(&mut self, _ctx: &WriteContext, value: i64) -> Result<(), CodecError> {
        self.put(&value.to_be_bytes())
    }

    fn write_float(&mut self, ctx: &WriteContext, value: f32) -> Result<(), CodecError> {
        self.write_int(ctx, value.to_bits() as i32)
    }

    fn write_double(&mut self, ctx: &WriteContext, value: f64) -> Result<(), CodecError> {
        self.write_long(ctx, value.to_bits() as i64)
    }

    fn write_char(&mut self, _ctx: &WriteContext, value: char) -> Result<(), CodecError> {
        let unit = u16::try_from(u32::from(value)).map_err(|_| {
            FormatError::new(format!(
                "character U+{:X} does not fit one code unit",
                u32::from(value)
            ))
        })?;
        self.put(&unit.to_be_bytes())
    }

    fn write_null(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CodecError> {
        self.out.flush()?;
        Ok(())
    }
}

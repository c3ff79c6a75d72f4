use std::io::{self, Read};

use umap::codec::{Encoding, FormatReader, ReadContext, ValueToken};
use umap::{CodecError, ExpectedKind, FormatError, PrimitiveType, Value};

use super::{PREFIX_NULL, PREFIX_VALUE};

pub struct BinaryReader<'a> {
    input: &'a mut dyn Read,
    encoding: Encoding,
}

impl<'a> BinaryReader<'a> {
    pub fn new(input: &'a mut dyn Read, encoding: Encoding) -> Self {
        Self { input, encoding }
    }

    // ---------------------------------------------------------------- helpers

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut buf = [0u8; N];
        self.input.read_exact(&mut buf).map_err(eof_or_io)?;
        Ok(buf)
    }

    fn read_len(&mut self) -> Result<usize, CodecError> {
        let len = u32::from_be_bytes(self.take()?);
        usize::try_from(len).map_err(|_| {
            FormatError::new(format!("length {len} exceeds addressable memory")).into()
        })
    }

    fn read_text(&mut self) -> Result<String, CodecError> {
        let len = self.read_len()?;
        let mut bytes = Vec::new();
        (&mut *self.input)
            .take(len as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() != len {
            return Err(FormatError::end_of_input().into());
        }
        Ok(self.encoding.decode(&bytes)?)
    }

    fn read_primitive(&mut self, kind: PrimitiveType) -> Result<Value, CodecError> {
        Ok(match kind {
            PrimitiveType::String => Value::String(self.read_text()?),
            PrimitiveType::Enum => Value::Enum(self.read_text()?),
            PrimitiveType::Bool => Value::Bool(self.take::<1>()?[0] != 0),
            PrimitiveType::Byte => Value::Byte(i8::from_be_bytes(self.take()?)),
            PrimitiveType::Short => Value::Short(i16::from_be_bytes(self.take()?)),
            PrimitiveType::Int => Value::Int(i32::from_be_bytes(self.take()?)),
            PrimitiveType::Long => Value::Long(i64::from_be_bytes(self.take()?)),
            PrimitiveType::Float => {
                Value::Float(f32::from_bits(u32::from_be_bytes(self.take()?)))
            }
            PrimitiveType::Double => {
                Value::Double(f64::from_bits(u64::from_be_bytes(self.take()?)))
            }
            PrimitiveType::Char => {
                let unit = u16::from_be_bytes(self.take()?);
                let c = char::from_u32(u32::from(unit)).ok_or_else(|| {
                    FormatError::new(format!("code unit {unit:#06x} is not a character"))
                })?;
                Value::Char(c)
            }
        })
    }

    /// Advances the array frame; `None` once every announced entry was read.
    fn next_entry(&mut self, ctx: &mut ReadContext) -> Result<Option<bool>, CodecError> {
        let announced = ctx
            .frame()
            .ok_or_else(|| CodecError::Internal("array entry read outside a frame".into()))?
            .remaining;
        let remaining = match announced {
            Some(n) => n,
            None => self.read_len()?,
        };
        let frame = ctx
            .frame_mut()
            .ok_or_else(|| CodecError::Internal("array entry read outside a frame".into()))?;
        if remaining == 0 {
            frame.remaining = Some(0);
            return Ok(None);
        }
        frame.remaining = Some(remaining - 1);
        Ok(Some(remaining == 1))
    }
}

fn eof_or_io(err: io::Error) -> CodecError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        FormatError::end_of_input().into()
    } else {
        err.into()
    }
}

impl FormatReader for BinaryReader<'_> {
    fn read_root_start(&mut self, _ctx: &mut ReadContext) -> Result<(), CodecError> {
        Ok(())
    }

    fn next_key_token(
        &mut self,
        _ctx: &mut ReadContext,
        expected: &str,
    ) -> Result<Option<String>, CodecError> {
        Ok(Some(expected.to_owned()))
    }

    fn next_value_token(
        &mut self,
        ctx: &mut ReadContext,
        _key: Option<&str>,
        expected: ExpectedKind,
        optional: bool,
        in_array: bool,
    ) -> Result<ValueToken, CodecError> {
        let mut is_last = false;
        if in_array {
            match self.next_entry(ctx)? {
                Some(last) => is_last = last,
                None => return Ok(ValueToken::end()),
            }
        } else if optional {
            match self.take::<1>()?[0] {
                PREFIX_NULL => return Ok(ValueToken::null(false)),
                PREFIX_VALUE => {}
                flag => {
                    return Err(FormatError::new(format!("invalid presence byte {flag}")).into())
                }
            }
        }

        Ok(match expected {
            ExpectedKind::Primitive(kind) => {
                ValueToken::scalar(self.read_primitive(kind)?, is_last)
            }
            ExpectedKind::Map => ValueToken::map_start(is_last),
            ExpectedKind::Array => ValueToken::array_start(is_last),
        })
    }

    fn read_root_end(&mut self, _ctx: &mut ReadContext) -> Result<(), CodecError> {
        Ok(())
    }
}

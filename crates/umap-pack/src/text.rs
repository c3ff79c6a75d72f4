//! Streaming character decoding for text formats.

use std::io::{self, Read, Write};

use umap::codec::Encoding;
use umap::{CodecError, FormatError};

const BUFFER_SIZE: usize = 8 * 1024;

/// Decodes characters from a byte stream one at a time, with one character
/// of lookahead. Positions count characters.
pub(crate) struct CharReader<'a> {
    input: &'a mut dyn Read,
    encoding: Encoding,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    peeked: Option<char>,
    position: usize,
}

impl<'a> CharReader<'a> {
    pub fn new(input: &'a mut dyn Read, encoding: Encoding) -> Self {
        Self {
            input,
            encoding,
            buf: vec![0; BUFFER_SIZE],
            start: 0,
            end: 0,
            peeked: None,
            position: 0,
        }
    }

    pub fn peek_char(&mut self) -> Result<Option<char>, CodecError> {
        if self.peeked.is_none() {
            self.peeked = self.decode()?;
        }
        Ok(self.peeked)
    }

    pub fn read_char(&mut self) -> Result<Option<char>, CodecError> {
        let c = match self.peeked.take() {
            Some(c) => Some(c),
            None => self.decode()?,
        };
        if c.is_some() {
            self.position += 1;
        }
        Ok(c)
    }

    /// Next character that is not whitespace, consumed.
    pub fn next_non_ws(&mut self) -> Result<Option<char>, CodecError> {
        loop {
            match self.read_char()? {
                Some(c) if c.is_whitespace() => continue,
                other => return Ok(other),
            }
        }
    }

    /// Next character that is not whitespace, left in place.
    pub fn peek_non_ws(&mut self) -> Result<Option<char>, CodecError> {
        loop {
            match self.peek_char()? {
                Some(c) if c.is_whitespace() => {
                    self.read_char()?;
                }
                other => return Ok(other),
            }
        }
    }

    pub fn error(&self, message: impl Into<String>) -> CodecError {
        FormatError::at(message, self.position).into()
    }

    fn byte(&mut self) -> Result<Option<u8>, CodecError> {
        if self.start == self.end {
            self.start = 0;
            self.end = loop {
                match self.input.read(&mut self.buf) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            if self.end == 0 {
                return Ok(None);
            }
        }
        let b = self.buf[self.start];
        self.start += 1;
        Ok(Some(b))
    }

    fn required_byte(&mut self) -> Result<u8, CodecError> {
        self.byte()?
            .ok_or_else(|| self.error("unexpected end of input inside a character"))
    }

    fn decode(&mut self) -> Result<Option<char>, CodecError> {
        match self.encoding {
            Encoding::Utf8 => self.decode_utf8(),
            Encoding::Utf16Be | Encoding::Utf16Le => self.decode_utf16(),
        }
    }

    fn decode_utf8(&mut self) -> Result<Option<char>, CodecError> {
        let Some(first) = self.byte()? else {
            return Ok(None);
        };
        let width = match first {
            0x00..=0x7F => return Ok(Some(char::from(first))),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(self.error("invalid utf-8")),
        };
        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self.required_byte()?;
        }
        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| self.error("invalid utf-8"))
    }

    fn unit(&mut self) -> Result<Option<u16>, CodecError> {
        let Some(a) = self.byte()? else {
            return Ok(None);
        };
        let b = self.required_byte()?;
        Ok(Some(match self.encoding {
            Encoding::Utf16Le => u16::from_le_bytes([a, b]),
            _ => u16::from_be_bytes([a, b]),
        }))
    }

    fn decode_utf16(&mut self) -> Result<Option<char>, CodecError> {
        let Some(first) = self.unit()? else {
            return Ok(None);
        };
        let mut units = vec![first];
        if (0xD800..0xDC00).contains(&first) {
            let second = self
                .unit()?
                .ok_or_else(|| self.error("unexpected end of input inside a character"))?;
            units.push(second);
        }
        match char::decode_utf16(units).next() {
            Some(Ok(c)) => Ok(Some(c)),
            _ => Err(self.error("unpaired surrogate in utf-16 text")),
        }
    }
}

/// Encodes text into the output stream with the pass encoding.
pub(crate) struct TextSink<'a> {
    out: &'a mut dyn Write,
    encoding: Encoding,
}

impl<'a> TextSink<'a> {
    pub fn new(out: &'a mut dyn Write, encoding: Encoding) -> Self {
        Self { out, encoding }
    }

    pub fn put(&mut self, text: &str) -> Result<(), CodecError> {
        self.out.write_all(&self.encoding.encode(text))?;
        Ok(())
    }

    pub fn put_char(&mut self, c: char) -> Result<(), CodecError> {
        let mut buf = [0u8; 4];
        self.put(c.encode_utf8(&mut buf))
    }

    pub fn spaces(&mut self, count: usize) -> Result<(), CodecError> {
        const SPACES: &str = "                                ";
        let mut left = count;
        while left > 0 {
            let n = left.min(SPACES.len());
            self.put(&SPACES[..n])?;
            left -= n;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.out.flush()?;
        Ok(())
    }
}

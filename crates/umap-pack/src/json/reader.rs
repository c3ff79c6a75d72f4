use std::io::Read;

use umap::codec::{Encoding, FormatReader, ReadContext, Token, ValueToken};
use umap::{CodecError, ExpectedKind, FieldError, FieldPath, Reason, Value};

use super::escape::read_quoted;
use crate::text::CharReader;

/// One open `{` or `[`.
#[derive(Debug)]
struct Level {
    close: char,
    entries: usize,
}

/// Streaming JSON tokenizer.
///
/// Entry separators are consumed lazily: a `,` is expected before every entry
/// but the first. After a scalar the reader looks ahead for the closing
/// bracket so it can flag the entry as the last one.
///
/// A reader serves a single decode pass over its input. The bracket stack
/// opens as the tokens are produced, one step ahead of the pass's
/// [`ReadContext`] frames, so it lives here and restarts with every root.
pub struct JsonReader<'a> {
    chars: CharReader<'a>,
    levels: Vec<Level>,
}

impl<'a> JsonReader<'a> {
    pub fn new(input: &'a mut dyn Read, encoding: Encoding) -> Self {
        Self {
            chars: CharReader::new(input, encoding),
            levels: Vec::new(),
        }
    }

    fn open(&mut self, close: char) {
        self.levels.push(Level { close, entries: 0 });
    }

    fn level_mut(&mut self) -> Result<&mut Level, CodecError> {
        self.levels
            .last_mut()
            .ok_or_else(|| CodecError::Internal("no open JSON structure".into()))
    }

    fn end_of_input(&self) -> CodecError {
        self.chars.error("unexpected end of input")
    }

    fn expect(&mut self, wanted: char) -> Result<(), CodecError> {
        match self.chars.next_non_ws()? {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(self.chars.error(format!("expected '{wanted}' but found '{c}'"))),
            None => Err(self.end_of_input()),
        }
    }

    /// Consumes the closing bracket of the innermost structure if it is next.
    fn try_close(&mut self, close: char) -> Result<bool, CodecError> {
        match self.chars.peek_non_ws()? {
            Some(c) if c == close => {
                self.chars.read_char()?;
                self.levels.pop();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(self.end_of_input()),
        }
    }

    /// Starts a new entry in the innermost structure.
    fn begin_entry(&mut self) -> Result<(), CodecError> {
        let level = self.level_mut()?;
        let first = level.entries == 0;
        level.entries += 1;
        if !first {
            self.expect(',')?;
        }
        Ok(())
    }

    fn read_key(&mut self) -> Result<String, CodecError> {
        self.begin_entry()?;
        self.expect('"')?;
        let key = read_quoted(&mut self.chars)?;
        self.expect(':')?;
        Ok(key)
    }

    /// After a scalar: `true` when it closed its structure.
    fn finish_scalar(&mut self) -> Result<bool, CodecError> {
        let close = self.level_mut()?.close;
        if self.try_close(close)? {
            return Ok(true);
        }
        match self.chars.peek_non_ws()? {
            Some(',') => Ok(false),
            Some(c) => Err(self
                .chars
                .error(format!("expected ',' or '{close}' but found '{c}'"))),
            None => Err(self.end_of_input()),
        }
    }

    /// Unquoted text up to the next delimiter, left unconsumed.
    fn read_literal(&mut self) -> Result<String, CodecError> {
        let mut literal = String::new();
        while let Some(c) = self.chars.peek_char()? {
            if matches!(c, ',' | '}' | ']') || c.is_whitespace() {
                break;
            }
            literal.push(c);
            self.chars.read_char()?;
        }
        if literal.is_empty() {
            return Err(self.chars.error("expected a value"));
        }
        Ok(literal)
    }

    /// Bare literals other than `null` are left to coercion as text, so a
    /// number is parsed straight into the declared kind.
    fn literal_token(literal: String) -> Token {
        if literal.eq_ignore_ascii_case("null") {
            Token::Null
        } else {
            Token::Scalar(Value::String(literal))
        }
    }

    fn skip(&mut self) -> Result<(), CodecError> {
        match self.chars.peek_non_ws()? {
            None => Err(self.end_of_input()),
            Some('"') => {
                self.chars.read_char()?;
                read_quoted(&mut self.chars).map(drop)
            }
            Some('{' | '[') => {
                self.chars.read_char()?;
                let mut depth = 1usize;
                while depth > 0 {
                    match self.chars.read_char()? {
                        None => return Err(self.end_of_input()),
                        Some('"') => {
                            read_quoted(&mut self.chars)?;
                        }
                        Some('{' | '[') => depth += 1,
                        Some('}' | ']') => depth -= 1,
                        Some(_) => {}
                    }
                }
                Ok(())
            }
            Some(_) => self.read_literal().map(drop),
        }
    }
}

impl FormatReader for JsonReader<'_> {
    fn read_root_start(&mut self, _ctx: &mut ReadContext) -> Result<(), CodecError> {
        self.levels.clear();
        self.expect('{')?;
        self.open('}');
        Ok(())
    }

    fn next_key_token(
        &mut self,
        _ctx: &mut ReadContext,
        _expected: &str,
    ) -> Result<Option<String>, CodecError> {
        if self.try_close('}')? {
            return Ok(None);
        }
        self.read_key().map(Some)
    }

    fn next_value_token(
        &mut self,
        _ctx: &mut ReadContext,
        _key: Option<&str>,
        _expected: ExpectedKind,
        _optional: bool,
        in_array: bool,
    ) -> Result<ValueToken, CodecError> {
        if in_array {
            if self.try_close(']')? {
                return Ok(ValueToken::end());
            }
            self.begin_entry()?;
        }

        match self.chars.peek_non_ws()? {
            None => Err(self.end_of_input()),
            Some('{') => {
                self.chars.read_char()?;
                self.open('}');
                Ok(ValueToken::map_start(false))
            }
            Some('[') => {
                self.chars.read_char()?;
                self.open(']');
                Ok(ValueToken::array_start(false))
            }
            Some('"') => {
                self.chars.read_char()?;
                let text = read_quoted(&mut self.chars)?;
                let is_last = self.finish_scalar()?;
                Ok(ValueToken::scalar(Value::String(text), is_last))
            }
            Some(_) => {
                let literal = self.read_literal()?;
                let token = Self::literal_token(literal);
                let is_last = self.finish_scalar()?;
                Ok(ValueToken { token, is_last })
            }
        }
    }

    /// Leaves the separator after the value for the next entry to consume.
    fn skip_value(&mut self, _ctx: &mut ReadContext, _key: &str) -> Result<(), CodecError> {
        self.skip()
    }

    /// Every declared key was read; anything but `}` is an undeclared key.
    fn read_map_end(&mut self, ctx: &mut ReadContext) -> Result<(), CodecError> {
        loop {
            if self.try_close('}')? {
                return Ok(());
            }
            let key = self.read_key()?;
            if !ctx.options().ignore_unknown_keys {
                return Err(FieldError::bare(FieldPath::key(key), Reason::UnknownKey).into());
            }
            tracing::warn!(depth = ctx.depth(), key = %key, "skipping undeclared key");
            self.skip()?;
        }
    }

    fn read_root_end(&mut self, _ctx: &mut ReadContext) -> Result<(), CodecError> {
        match self.chars.next_non_ws()? {
            None => Ok(()),
            Some(c) => Err(self
                .chars
                .error(format!("unexpected '{c}' after the document"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umap::codec::decode::read_document;
    use umap::codec::ReaderOptions;
    use umap::{MapTemplate, Template};

    #[test]
    fn each_root_starts_with_a_fresh_bracket_stack() {
        let mut input: &[u8] = br#"{"a":[ {"a":[]}"#;
        let mut reader = JsonReader::new(&mut input, Encoding::Utf8);
        let options = ReaderOptions::default();

        let mut ctx = ReadContext::new(options.clone());
        reader.read_root_start(&mut ctx).unwrap();
        assert_eq!(reader.next_key_token(&mut ctx, "a").unwrap().as_deref(), Some("a"));
        let token = reader
            .next_value_token(&mut ctx, Some("a"), ExpectedKind::Array, false, false)
            .unwrap();
        assert_eq!(token.token, Token::ArrayStart);
        assert_eq!(reader.levels.len(), 2);

        let template = MapTemplate::builder()
            .required("a", Template::int().as_array())
            .build_arc()
            .unwrap();
        let doc = read_document(&mut reader, &template, &options).unwrap();
        assert_eq!(doc.get("a").and_then(Value::as_array).map(|a| a.len()), Some(0));
        assert!(reader.levels.is_empty());
    }
}

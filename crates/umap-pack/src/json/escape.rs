//! JSON string escaping.

use umap::CodecError;

use crate::text::{CharReader, TextSink};

/// Writes `s` as a quoted JSON string.
pub(crate) fn write_quoted(sink: &mut TextSink<'_>, s: &str) -> Result<(), CodecError> {
    sink.put_char('"')?;
    let mut run_start = 0;
    for (i, c) in s.char_indices() {
        let escaped = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '/' => "\\/",
            '\u{08}' => "\\b",
            '\u{0C}' => "\\f",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            c if (c as u32) < 0x20 => "",
            _ => continue,
        };
        sink.put(&s[run_start..i])?;
        if escaped.is_empty() {
            sink.put(&format!("\\u{:04x}", c as u32))?;
        } else {
            sink.put(escaped)?;
        }
        run_start = i + c.len_utf8();
    }
    sink.put(&s[run_start..])?;
    sink.put_char('"')
}

/// Reads the rest of a quoted string; the opening quote is already consumed.
pub(crate) fn read_quoted(chars: &mut CharReader<'_>) -> Result<String, CodecError> {
    let mut out = String::new();
    loop {
        match chars.read_char()? {
            None => return Err(chars.error("unterminated string")),
            Some('"') => return Ok(out),
            Some('\\') => out.push(read_escape(chars)?),
            Some(c) => out.push(c),
        }
    }
}

fn read_escape(chars: &mut CharReader<'_>) -> Result<char, CodecError> {
    let c = chars
        .read_char()?
        .ok_or_else(|| chars.error("unterminated escape sequence"))?;
    Ok(match c {
        '"' => '"',
        '\\' => '\\',
        '/' => '/',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'u' => return read_unicode(chars),
        other => return Err(chars.error(format!("invalid escape sequence \\{other}"))),
    })
}

fn read_unicode(chars: &mut CharReader<'_>) -> Result<char, CodecError> {
    let first = read_hex4(chars)?;
    if !(0xD800..0xDC00).contains(&first) {
        return char::from_u32(u32::from(first))
            .ok_or_else(|| chars.error("unpaired surrogate in \\u escape"));
    }
    if chars.read_char()? != Some('\\') || chars.read_char()? != Some('u') {
        return Err(chars.error("unpaired surrogate in \\u escape"));
    }
    let second = read_hex4(chars)?;
    char::decode_utf16([first, second])
        .next()
        .and_then(Result::ok)
        .ok_or_else(|| chars.error("unpaired surrogate in \\u escape"))
}

fn read_hex4(chars: &mut CharReader<'_>) -> Result<u16, CodecError> {
    let mut unit = 0u16;
    for _ in 0..4 {
        let digit = chars
            .read_char()?
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| chars.error("invalid \\u escape"))?;
        unit = unit << 4 | digit as u16;
    }
    Ok(unit)
}

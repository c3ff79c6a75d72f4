//! Schema-driven decoding over any [`FormatReader`].

use std::sync::Arc;

use super::context::ReadContext;
use super::format::FormatReader;
use super::options::ReaderOptions;
use super::token::Token;
use crate::document::{ArrayBuilder, MapBuilder, MapDocument};
use crate::error::{CodecError, FieldError, FieldPath, FormatError, PathSegment, Reason};
use crate::template::{ArrayTemplate, MapTemplate, Template};
use crate::value::Value;

/// Reads one root map document from `reader`.
pub fn read_document(
    reader: &mut dyn FormatReader,
    template: &Arc<MapTemplate>,
    options: &ReaderOptions,
) -> Result<MapDocument, CodecError> {
    let mut ctx = ReadContext::new(options.clone());
    reader.read_root_start(&mut ctx)?;
    let document = read_map(reader, &mut ctx, template)?;
    reader.read_root_end(&mut ctx)?;
    Ok(document)
}

fn read_map(
    reader: &mut dyn FormatReader,
    ctx: &mut ReadContext,
    template: &Arc<MapTemplate>,
) -> Result<MapDocument, CodecError> {
    ctx.enter();
    let result = read_map_entries(reader, ctx, template);
    ctx.exit();
    result
}

fn read_map_entries(
    reader: &mut dyn FormatReader,
    ctx: &mut ReadContext,
    template: &Arc<MapTemplate>,
) -> Result<MapDocument, CodecError> {
    let watermark = ctx.depth();
    let ignore_unknown = ctx.options().ignore_unknown_keys;
    let mut builder = MapBuilder::new(Arc::clone(template));
    let mut exhausted = false;

    loop {
        let Some(expected) = builder.next_key().map(str::to_owned) else {
            exhausted = true;
            break;
        };
        let Some(key) = reader.next_key_token(ctx, &expected)? else {
            break;
        };
        let Some(mapping) = template.get(&key) else {
            if ignore_unknown {
                tracing::warn!(depth = ctx.depth(), key = %key, "skipping undeclared key");
                reader.skip_value(ctx, &key)?;
                continue;
            }
            return Err(FieldError::bare(FieldPath::key(key), Reason::UnknownKey).into());
        };

        let token = reader.next_value_token(
            ctx,
            Some(&key),
            mapping.template().expected_kind(),
            mapping.is_optional(),
            false,
        )?;
        tracing::trace!(
            depth = ctx.depth(),
            key = %key,
            token = token.token.describe(),
            "read mapping"
        );
        let is_last = token.is_last;
        let value = read_value(reader, ctx, mapping.template(), token.token)
            .map_err(|e| e.under(PathSegment::Key(key.clone())))?;
        builder.set(&key, value.unwrap_or(Value::Null))?;
        ctx.advance();

        if ctx.depth() < watermark || is_last {
            break;
        }
    }

    if exhausted {
        reader.read_map_end(ctx)?;
    }
    Ok(builder.build()?)
}

fn read_array(
    reader: &mut dyn FormatReader,
    ctx: &mut ReadContext,
    template: &Arc<ArrayTemplate>,
) -> Result<Value, CodecError> {
    ctx.enter();
    let result = read_array_entries(reader, ctx, template);
    ctx.exit();
    result
}

fn read_array_entries(
    reader: &mut dyn FormatReader,
    ctx: &mut ReadContext,
    template: &Arc<ArrayTemplate>,
) -> Result<Value, CodecError> {
    let watermark = ctx.depth();
    let entry = template.entry();
    let mut builder = ArrayBuilder::new(Arc::clone(template));

    loop {
        let index = builder.len();
        let token = reader.next_value_token(ctx, None, entry.expected_kind(), false, true)?;
        if token.token == Token::End {
            break;
        }
        tracing::trace!(depth = ctx.depth(), index, token = token.token.describe(), "read entry");
        let is_last = token.is_last;
        let value = read_value(reader, ctx, entry, token.token)
            .map_err(|e| e.under(PathSegment::Index(index)))?;
        builder.add(value.unwrap_or(Value::Null))?;
        ctx.advance();

        if ctx.depth() < watermark || is_last {
            break;
        }
    }
    Ok(Value::Array(builder.build()?))
}

/// Turns one token into a value; `None` stands for null.
fn read_value(
    reader: &mut dyn FormatReader,
    ctx: &mut ReadContext,
    template: &Template,
    token: Token,
) -> Result<Option<Value>, CodecError> {
    match (token, template) {
        (Token::Null, _) => Ok(None),
        (Token::Scalar(value), Template::Primitive(_)) => Ok(Some(value)),
        (Token::MapStart, Template::Map(nested)) => {
            read_map(reader, ctx, nested).map(|doc| Some(Value::Map(doc)))
        }
        (Token::ArrayStart, Template::Array(nested)) => read_array(reader, ctx, nested).map(Some),
        (Token::End, _) => Err(FormatError::new(format!(
            "structure ended where a {} was expected",
            template.type_name()
        ))
        .into()),
        (token, template) => {
            let preview = match &token {
                Token::Scalar(value) => value.preview(),
                other => format!("[{}]", other.describe()),
            };
            Err(FieldError::bare(FieldPath::root(), Reason::ValueTypeMismatch)
                .with_preview(preview)
                .with_details(format!("expected type {}", template.type_name()))
                .into())
        }
    }
}

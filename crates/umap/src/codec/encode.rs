//! Schema-driven encoding over any [`FormatWriter`].

use super::context::WriteContext;
use super::format::{FormatWriter, MappingSlot};
use super::options::WriterOptions;
use crate::document::{ArrayDocument, MapDocument};
use crate::error::{CodecError, FieldError, FieldPath, PathSegment, Reason};
use crate::template::Mapping;
use crate::value::Value;

/// Writes `document` as a root map, keeping only mappings with
/// `detail_level <= detail_level`. Flushes the writer on success.
pub fn write_document(
    writer: &mut dyn FormatWriter,
    document: &MapDocument,
    options: &WriterOptions,
    detail_level: u32,
) -> Result<(), CodecError> {
    let mut ctx = WriteContext::new(options.clone());
    writer.write_root_start(&ctx)?;
    write_map(writer, &mut ctx, document, detail_level)?;
    writer.write_root_end(&ctx)?;
    writer.flush()
}

fn write_map(
    writer: &mut dyn FormatWriter,
    ctx: &mut WriteContext,
    document: &MapDocument,
    detail_level: u32,
) -> Result<(), CodecError> {
    let template = document.template();
    let mappings: Vec<&Mapping> = template.limit_detail_level(detail_level).collect();
    let width = template.max_key_width();

    ctx.open(mappings.len());
    ctx.set_max_key_width(width);
    writer.write_map_start(ctx)?;
    ctx.descend();

    for (index, mapping) in mappings.iter().enumerate() {
        let key = mapping.name();
        let value = document.get(key);
        if value.is_none() && !mapping.is_optional() {
            return Err(FieldError::bare(FieldPath::key(key), Reason::MissingValue).into());
        }
        let slot = MappingSlot {
            key,
            optional: mapping.is_optional(),
            assigned: value.is_some(),
            index,
            last: index + 1 == mappings.len(),
        };
        tracing::trace!(depth = ctx.depth(), key, assigned = slot.assigned, "write mapping");

        writer.write_mapping_prefix(ctx, &slot)?;
        match value {
            Some(value) => write_value(writer, ctx, value, detail_level)
                .map_err(|e| e.under(PathSegment::Key(key.to_owned())))?,
            None => writer.write_null(ctx)?,
        }
        ctx.set_max_key_width(width);
        writer.write_mapping_suffix(ctx, &slot)?;
    }

    ctx.ascend();
    writer.write_map_end(ctx)?;
    ctx.close();
    Ok(())
}

fn write_array(
    writer: &mut dyn FormatWriter,
    ctx: &mut WriteContext,
    array: &ArrayDocument,
    detail_level: u32,
) -> Result<(), CodecError> {
    let len = array.len();
    ctx.open(len);
    writer.write_array_start(ctx, len)?;
    ctx.descend();

    for (index, item) in array.iter().enumerate() {
        let last = index + 1 == len;
        writer.write_entry_prefix(ctx, index, last)?;
        write_value(writer, ctx, item, detail_level)
            .map_err(|e| e.under(PathSegment::Index(index)))?;
        writer.write_entry_suffix(ctx, index, last)?;
    }

    ctx.ascend();
    writer.write_array_end(ctx, len)?;
    ctx.close();
    Ok(())
}

fn write_value(
    writer: &mut dyn FormatWriter,
    ctx: &mut WriteContext,
    value: &Value,
    detail_level: u32,
) -> Result<(), CodecError> {
    match value {
        Value::Map(doc) => write_map(writer, ctx, doc, detail_level),
        Value::Array(doc) => write_array(writer, ctx, doc, detail_level),
        scalar => writer.write_primitive(ctx, scalar),
    }
}

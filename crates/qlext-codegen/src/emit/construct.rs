//! Factory functions building the external object from a generated struct.
//!
//! Arguments are the non-synthetic fields in struct order, which must be the
//! external constructor's parameter order. Fields stored as identifiers go
//! through the context resolver; handles are re-wrapped; quote handles
//! without a resolver are built from the stored value holder.

use super::writer::SourceWriter;
use crate::config::EntryConfig;
use crate::mapping::{LookupTables, TypeKind};
use crate::profile::Wrapper;
use crate::schema::{EntitySchema, FieldDescriptor, StructDescriptor, TaggedUnionDescriptor};

/// Argument expression for one field.
pub fn argument_expression(field: &FieldDescriptor, tables: &LookupTables) -> String {
    let profile = &tables.profile;
    let value = format!("v.{}", field.name);
    let resolved = tables
        .resolver(&field.source_type)
        .map(|resolver| format!("{resolver}({value})"));

    match profile.unwrap_template(&field.source_type) {
        Some((Wrapper::Handle, inner)) => {
            let inner = profile.qualify(inner);
            let wrapped = match resolved {
                Some(expr) => expr,
                None if field.kind == TypeKind::QuoteHolder => format!(
                    "{}<{}>({value})",
                    profile.make_shared_fn(),
                    profile.quote_holder()
                ),
                None => value,
            };
            format!("{}<{inner}>({wrapped})", profile.handle())
        }
        _ => resolved.unwrap_or(value),
    }
}

fn signature(entity: &str, argument: &str, tables: &LookupTables) -> String {
    let profile = &tables.profile;
    format!(
        "{}<{}> create(const {}& {}, const {argument}& v)",
        profile.shared_ptr(),
        profile.qualify(entity),
        profile.context_type,
        profile.context_name,
    )
}

fn emit_factory(
    w: &mut SourceWriter,
    entry: &EntryConfig,
    entity: &str,
    descriptor: &StructDescriptor,
    tables: &LookupTables,
) {
    let profile = &tables.profile;
    w.line(format!(
        "{} {{",
        signature(entity, &entry.qualified(&descriptor.name), tables)
    ));
    w.indent();

    let args: Vec<String> = descriptor
        .constructor_fields()
        .map(|f| argument_expression(f, tables))
        .collect();
    let make = format!("{}<{}>", profile.make_shared_fn(), profile.qualify(entity));
    if args.is_empty() {
        w.line(format!("return {make}();"));
    } else {
        w.line(format!("return {make}("));
        w.indent();
        let last = args.len() - 1;
        for (i, arg) in args.iter().enumerate() {
            if i == last {
                w.line(arg);
            } else {
                w.line(format!("{arg},"));
            }
        }
        w.dedent();
        w.line(");");
    }

    w.dedent();
    w.line("}");
    w.blank();
}

fn emit_union_factory(
    w: &mut SourceWriter,
    entry: &EntryConfig,
    entity: &str,
    union: &TaggedUnionDescriptor,
    tables: &LookupTables,
) {
    let context = &tables.profile.context_name;
    w.line(format!(
        "{} {{",
        signature(entity, &entry.qualified(&union.name), tables)
    ));
    w.indent();
    w.line(format!(
        "return std::visit([&{context}](const auto& alt) {{ return create({context}, alt); }}, v);"
    ));
    w.dedent();
    w.line("}");
    w.blank();
}

/// Emits one `create` declaration per struct, then one for the union.
pub(crate) fn emit_declarations(
    w: &mut SourceWriter,
    entry: &EntryConfig,
    schema: &EntitySchema,
    tables: &LookupTables,
) {
    for descriptor in &schema.structs {
        w.line(format!(
            "{};",
            signature(&schema.entity, &entry.qualified(&descriptor.name), tables)
        ));
    }
    if let Some(union) = &schema.union {
        w.line(format!(
            "{};",
            signature(&schema.entity, &entry.qualified(&union.name), tables)
        ));
    }
    w.blank();
}

/// Emits one factory per struct, plus a dispatching factory for the union.
pub(crate) fn emit_factories(
    w: &mut SourceWriter,
    entry: &EntryConfig,
    schema: &EntitySchema,
    tables: &LookupTables,
) {
    for descriptor in &schema.structs {
        emit_factory(w, entry, &schema.entity, descriptor, tables);
    }
    if let Some(union) = &schema.union {
        emit_union_factory(w, entry, &schema.entity, union, tables);
    }
}

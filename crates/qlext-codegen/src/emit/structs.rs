//! Struct and `std::variant` declarations.

use super::writer::SourceWriter;
use crate::config::EntryConfig;
use crate::schema::{EntitySchema, FieldDescriptor, StructDescriptor, TaggedUnionDescriptor};

fn field_line(field: &FieldDescriptor) -> String {
    if field.has_default() {
        format!(
            "{:<35} {:<20} = {:<35};",
            field.field_type, field.name, field.default
        )
    } else {
        format!("{:<35} {:<58};", field.field_type, field.name)
    }
}

fn emit_struct(w: &mut SourceWriter, descriptor: &StructDescriptor) {
    w.line(format!("struct {} {{", descriptor.name));
    w.indent();
    for field in &descriptor.fields {
        w.line(field_line(field));
    }
    w.dedent();
    w.line("};");
    w.blank();
}

fn emit_union(w: &mut SourceWriter, union: &TaggedUnionDescriptor) {
    w.line(format!(
        "using {} = std::variant<{}>;",
        union.name,
        union.variants.join(",")
    ));
}

/// Emits the namespace block holding every struct and the union.
pub(crate) fn emit_declarations(w: &mut SourceWriter, entry: &EntryConfig, schema: &EntitySchema) {
    let namespaced = !entry.namespace.is_empty();
    if namespaced {
        w.line(format!("namespace {} {{", entry.namespace));
        w.indent();
    }
    for descriptor in &schema.structs {
        emit_struct(w, descriptor);
    }
    if let Some(union) = &schema.union {
        emit_union(w, union);
    }
    if namespaced {
        w.dedent();
        w.line("}");
    }
    w.blank();
}

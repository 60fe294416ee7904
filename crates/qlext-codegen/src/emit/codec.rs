//! `to_json` / `from_json` declarations and definitions.
//!
//! Every struct, every union and the `std::vector` of each gets a pair of
//! functions. Struct decoding walks the keys of the input object and ignores
//! the ones it does not know. Union decoding dispatches on `_ver_` and throws
//! `std::invalid_argument` when no variant carries the tag. Vector decoding
//! clears the target before appending.

use super::writer::SourceWriter;
use crate::config::EntryConfig;
use crate::profile::TargetProfile;
use crate::schema::{EntitySchema, StructDescriptor, TaggedUnionDescriptor, VERSION_FIELD};

/// Qualified names of every codec target, union first.
fn targets(entry: &EntryConfig, schema: &EntitySchema) -> Vec<String> {
    let mut names = Vec::with_capacity(schema.structs.len() + 1);
    if let Some(union) = &schema.union {
        names.push(entry.qualified(&union.name));
    }
    names.extend(schema.structs.iter().map(|s| entry.qualified(&s.name)));
    names
}

/// Emits the four groups of declarations.
pub(crate) fn emit_declarations(
    w: &mut SourceWriter,
    entry: &EntryConfig,
    schema: &EntitySchema,
    profile: &TargetProfile,
) {
    let json = &profile.json_type;
    let names = targets(entry, schema);

    for name in &names {
        w.line(format!("void from_json({name}& v, const {json}& j);"));
    }
    for name in &names {
        w.line(format!("void from_json(std::vector<{name}>& v, const {json}& j);"));
    }
    for name in &names {
        w.line(format!("{json} to_json(const {name}& v);"));
    }
    for name in &names {
        w.line(format!("{json} to_json(const std::vector<{name}>& v);"));
    }
    w.blank();
}

fn emit_struct_from_json(
    w: &mut SourceWriter,
    qualified: &str,
    descriptor: &StructDescriptor,
    json: &str,
) {
    w.line(format!("void from_json({qualified}& v, const {json}& j) {{"));
    w.indent();
    w.line("for (const auto& [key, val] : j.items()) {");
    w.indent();
    for (i, field) in descriptor.fields.iter().enumerate() {
        let keyword = if i == 0 { "if" } else { "else if" };
        w.line(format!("{keyword} (key == \"{}\")", field.name));
        w.indent();
        w.line(format!("from_json(v.{}, val);", field.name));
        w.dedent();
    }
    w.dedent();
    w.line("}");
    w.dedent();
    w.line("}");
    w.blank();
}

fn emit_union_from_json(
    w: &mut SourceWriter,
    entry: &EntryConfig,
    union: &TaggedUnionDescriptor,
    variants: &[StructDescriptor],
    json: &str,
) {
    let qualified = entry.qualified(&union.name);
    w.line(format!("void from_json({qualified}& v, const {json}& j) {{"));
    w.indent();
    w.line(format!(
        "const auto ver = j.at(\"{VERSION_FIELD}\").get<std::string>();"
    ));
    for variant in variants {
        let tag = variant.version.as_deref().unwrap_or_default();
        w.line(format!("if (ver == \"{tag}\") {{"));
        w.indent();
        w.line(format!("{} obj;", entry.qualified(&variant.name)));
        w.line("from_json(obj, j);");
        w.line("v = obj;");
        w.line("return;");
        w.dedent();
        w.line("}");
    }
    w.blank();
    w.line(format!(
        "throw std::invalid_argument(\"{qualified}: unknown version tag '\" + ver + \"'\");"
    ));
    w.dedent();
    w.line("}");
    w.blank();
}

fn emit_vector_from_json(w: &mut SourceWriter, qualified: &str, json: &str) {
    w.line(format!(
        "void from_json(std::vector<{qualified}>& v, const {json}& j) {{"
    ));
    w.indent();
    w.line("v.clear();");
    w.line("for (const auto& val : j) {");
    w.indent();
    w.line(format!("{qualified} t;"));
    w.line("from_json(t, val);");
    w.line("v.push_back(t);");
    w.dedent();
    w.line("}");
    w.dedent();
    w.line("}");
    w.blank();
}

fn emit_struct_to_json(
    w: &mut SourceWriter,
    qualified: &str,
    descriptor: &StructDescriptor,
    json: &str,
) {
    w.line(format!("{json} to_json(const {qualified}& v) {{"));
    w.indent();
    w.line(format!("{json} j = {{"));
    w.indent();
    for field in &descriptor.fields {
        let key = format!("\"{}\"", field.name);
        let value = format!("to_json(v.{})", field.name);
        w.line(format!("{{{key:<23},  {value:<32}}},"));
    }
    w.dedent();
    w.line("};");
    w.blank();
    w.line("return j;");
    w.dedent();
    w.line("}");
    w.blank();
}

fn emit_union_to_json(
    w: &mut SourceWriter,
    entry: &EntryConfig,
    union: &TaggedUnionDescriptor,
    json: &str,
) {
    let qualified = entry.qualified(&union.name);
    w.line(format!("{json} to_json(const {qualified}& v) {{"));
    w.indent();
    for variant in &union.variants {
        let variant = entry.qualified(variant);
        w.line(format!("if (const auto* p = std::get_if<{variant}>(&v)) {{"));
        w.indent();
        w.line("return to_json(*p);");
        w.dedent();
        w.line("}");
    }
    w.blank();
    w.line(format!("return {json}::object();"));
    w.dedent();
    w.line("}");
    w.blank();
}

fn emit_vector_to_json(w: &mut SourceWriter, qualified: &str, json: &str) {
    w.line(format!("{json} to_json(const std::vector<{qualified}>& v) {{"));
    w.indent();
    w.line(format!("{json} j = {json}::array();"));
    w.line("for (const auto& t : v) {");
    w.indent();
    w.line("j.push_back(to_json(t));");
    w.dedent();
    w.line("}");
    w.line("return j;");
    w.dedent();
    w.line("}");
    w.blank();
}

/// Emits every codec definition for the body file.
pub(crate) fn emit_definitions(
    w: &mut SourceWriter,
    entry: &EntryConfig,
    schema: &EntitySchema,
    profile: &TargetProfile,
) {
    let json = &profile.json_type;
    let names = targets(entry, schema);

    if let Some(union) = &schema.union {
        emit_union_from_json(w, entry, union, &schema.structs, json);
    }
    for descriptor in &schema.structs {
        emit_struct_from_json(w, &entry.qualified(&descriptor.name), descriptor, json);
    }
    for name in &names {
        emit_vector_from_json(w, name, json);
    }

    if let Some(union) = &schema.union {
        emit_union_to_json(w, entry, union, json);
    }
    for descriptor in &schema.structs {
        emit_struct_to_json(w, &entry.qualified(&descriptor.name), descriptor, json);
    }
    for name in &names {
        emit_vector_to_json(w, name, json);
    }
}

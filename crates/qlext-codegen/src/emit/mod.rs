//! C++ source emission.
//!
//! One [`EntitySchema`] becomes one header/body pair:
//!
//! - the header carries the struct and union declarations, the factory
//!   declarations and the codec declarations;
//! - the body carries the codec definitions and the factory definitions.

mod codec;
mod construct;
mod structs;
mod writer;

pub use construct::argument_expression;

use crate::config::EntryConfig;
use crate::mapping::LookupTables;
use crate::schema::EntitySchema;
use writer::SourceWriter;

/// The generated header/body pair of one configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Base name of both files.
    pub file_stem: String,
    /// Content of `{file_stem}.h`.
    pub header: String,
    /// Content of `{file_stem}.cpp`.
    pub body: String,
    /// The schema the files were generated from.
    pub schema: EntitySchema,
}

impl GeneratedUnit {
    /// Header file name.
    pub fn header_name(&self) -> String {
        format!("{}.h", self.file_stem)
    }

    /// Body file name.
    pub fn body_name(&self) -> String {
        format!("{}.cpp", self.file_stem)
    }
}

fn emit_header(entry: &EntryConfig, schema: &EntitySchema, tables: &LookupTables) -> String {
    let mut w = SourceWriter::new();
    w.line("#pragma once");
    w.blank();
    for include in &tables.profile.includes {
        w.line(format!("#include {include}"));
    }
    w.blank();
    structs::emit_declarations(&mut w, entry, schema);
    construct::emit_declarations(&mut w, entry, schema, tables);
    codec::emit_declarations(&mut w, entry, schema, &tables.profile);
    w.finish()
}

fn emit_body(entry: &EntryConfig, schema: &EntitySchema, tables: &LookupTables) -> String {
    let mut w = SourceWriter::new();
    w.line(format!("#include \"{}.h\"", entry.output_file));
    w.blank();
    codec::emit_definitions(&mut w, entry, schema, &tables.profile);
    construct::emit_factories(&mut w, entry, schema, tables);
    w.finish()
}

/// Renders the header and body for `schema`.
pub fn emit_unit(entry: &EntryConfig, schema: EntitySchema, tables: &LookupTables) -> GeneratedUnit {
    GeneratedUnit {
        file_stem: entry.output_file.clone(),
        header: emit_header(entry, &schema, tables),
        body: emit_body(entry, &schema, tables),
        schema,
    }
}

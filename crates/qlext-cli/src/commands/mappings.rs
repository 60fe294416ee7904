//! Mappings command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use qlext_codegen::LookupTables;

use crate::cli::OutputFormat;
use crate::commands::load_tables;
use crate::output::print_output;

/// Arguments for the mappings command.
#[derive(Args, Debug)]
pub struct MappingsArgs {
    /// TOML mappings layered over the standard lookup tables
    #[arg(short, long, env = "QLEXT_MAPPINGS")]
    pub mappings: Option<PathBuf>,

    /// Only this table
    #[arg(short, long, value_enum)]
    pub table: Option<TableKind>,
}

/// Lookup table selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableKind {
    /// Source type to target type
    Types,
    /// Default value rewrites
    Values,
    /// Identifier-resolved types
    Resolvers,
    /// Target library profile
    Profile,
}

/// One lookup-table entry or profile setting.
#[derive(Debug, Serialize, Tabled)]
struct MappingRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
}

fn table_rows(table: &'static str, entries: &BTreeMap<String, String>) -> Vec<MappingRow> {
    entries
        .iter()
        .map(|(source, target)| MappingRow {
            table,
            source: source.clone(),
            target: target.clone(),
        })
        .collect()
}

fn profile_rows(tables: &LookupTables) -> Vec<MappingRow> {
    let profile = &tables.profile;
    [
        ("library_namespace", profile.library_namespace.clone()),
        ("handle", profile.handle()),
        ("shared_ptr", profile.shared_ptr()),
        ("make_shared", profile.make_shared_fn()),
        ("quote_holder", profile.quote_holder()),
        ("identifier_type", profile.identifier_type.clone()),
        ("context_type", profile.context_type.clone()),
        ("json_type", profile.json_type.clone()),
        ("includes", profile.includes.join(" ")),
    ]
    .into_iter()
    .map(|(source, target)| MappingRow {
        table: "profile",
        source: source.to_string(),
        target,
    })
    .collect()
}

/// Execute the mappings command.
pub fn execute(args: MappingsArgs, format: OutputFormat) -> Result<()> {
    let tables = load_tables(args.mappings.as_deref())?;
    let wanted = |kind: TableKind| args.table.map_or(true, |t| t == kind);

    let mut rows = Vec::new();
    if wanted(TableKind::Types) {
        rows.extend(table_rows("types", &tables.types));
    }
    if wanted(TableKind::Values) {
        rows.extend(table_rows("values", &tables.values));
    }
    if wanted(TableKind::Resolvers) {
        rows.extend(table_rows("resolvers", &tables.resolvers));
    }
    if wanted(TableKind::Profile) {
        rows.extend(profile_rows(&tables));
    }

    print_output(&rows, format)
}

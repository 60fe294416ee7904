//! Inspect command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use qlext_codegen::{EntitySchema, Generator};

use crate::cli::OutputFormat;
use crate::commands::{definitions_dir, entry_schema, load_config, load_tables};
use crate::output::{print_header, print_output, print_warning};

/// Arguments for the inspect command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Generation config (JSON array of entries)
    #[arg(short, long, env = "QLEXT_CONFIG")]
    pub config: PathBuf,

    /// Only this entry (by struct name)
    #[arg(short, long)]
    pub entry: Option<String>,

    /// Directory holding the definitions files. Defaults to the config's directory.
    #[arg(short, long)]
    pub definitions_dir: Option<PathBuf>,

    /// TOML mappings layered over the standard lookup tables
    #[arg(short, long, env = "QLEXT_MAPPINGS")]
    pub mappings: Option<PathBuf>,
}

#[derive(Debug, Serialize, Tabled)]
struct FieldRow {
    #[tabled(rename = "Struct")]
    #[serde(rename = "struct")]
    struct_name: String,
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    field_type: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Origin")]
    origin: String,
}

fn field_rows(schema: &EntitySchema) -> Vec<FieldRow> {
    schema
        .structs
        .iter()
        .flat_map(|s| {
            s.fields.iter().map(move |f| FieldRow {
                struct_name: s.name.clone(),
                field: f.name.clone(),
                field_type: f.field_type.clone(),
                default: f.default.clone(),
                origin: f.origin.as_str().to_string(),
            })
        })
        .collect()
}

/// Execute the inspect command.
pub fn execute(args: InspectArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(&args.config)?;
    let generator = Generator::new(load_tables(args.mappings.as_deref())?);
    let definitions = definitions_dir(&args.config, args.definitions_dir.as_deref());

    let entries = match &args.entry {
        Some(name) => vec![config.entry(name)?],
        None => config.entries.iter().collect(),
    };

    let mut rows = Vec::new();
    for entry in entries {
        match entry_schema(&generator, entry, &definitions)? {
            Ok(schema) => {
                if format == OutputFormat::Table {
                    let title = match &schema.union {
                        Some(union) => format!(
                            "{} ({} overloads, union {})",
                            schema.entity,
                            schema.overload_count(),
                            union.name
                        ),
                        None => format!("{} (1 overload)", schema.entity),
                    };
                    print_header(&title);
                    print_output(&field_rows(&schema), format)?;
                } else {
                    rows.extend(field_rows(&schema));
                }
            }
            Err(reason) => print_warning(&format!("{}: skipped, {reason}", entry.struct_name)),
        }
    }

    if format != OutputFormat::Table {
        print_output(&rows, format)?;
    }
    Ok(())
}

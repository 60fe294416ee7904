//! Check command implementation.
//!
//! Decodes a JSON document with the reference codec of one entry and prints
//! its canonical re-encoding. Decoding follows the generated `from_json`:
//! unknown keys are dropped, absent keys keep their defaults and a union
//! dispatches on `_ver_`. String, numeric and boolean fields must hold a
//! value of that JSON kind; dates, periods, enums and quotes are not
//! type-checked.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use qlext_codegen::{encode_sequence, CodegenError, Generator, SchemaDocument, SchemaValue};

use crate::cli::OutputFormat;
use crate::commands::{definitions_dir, load_config, load_tables, require_schema};
use crate::error::CliError;
use crate::output::{print_single, print_success};

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Generation config (JSON array of entries)
    #[arg(short, long, env = "QLEXT_CONFIG")]
    pub config: PathBuf,

    /// Entry whose codec decodes the document (by struct name)
    #[arg(short, long)]
    pub entry: String,

    /// JSON document to decode
    #[arg(long)]
    pub document: PathBuf,

    /// The document is an array of values
    #[arg(long)]
    pub sequence: bool,

    /// Directory holding the definitions files. Defaults to the config's directory.
    #[arg(short, long)]
    pub definitions_dir: Option<PathBuf>,

    /// TOML mappings layered over the standard lookup tables
    #[arg(short, long, env = "QLEXT_MAPPINGS")]
    pub mappings: Option<PathBuf>,
}

fn read_document(path: &Path) -> Result<Value, CliError> {
    let document_error = |message: String| CliError::Document {
        path: path.to_path_buf(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| document_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| document_error(e.to_string()))
}

/// Execute the check command.
pub fn execute(args: CheckArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(&args.config)?;
    let entry = config.entry(&args.entry)?;
    let generator = Generator::new(load_tables(args.mappings.as_deref())?);
    let definitions = definitions_dir(&args.config, args.definitions_dir.as_deref());
    let schema = require_schema(&generator, entry, &definitions)?;
    let document = SchemaDocument::new(&schema);
    let tree = read_document(&args.document)?;

    let (canonical, count) = if args.sequence {
        let values = document.decode_sequence(&tree).map_err(CodegenError::from)?;
        (encode_sequence(&values, SchemaValue::to_json), values.len())
    } else {
        let value = document.decode(&tree).map_err(CodegenError::from)?;
        (value.to_json(), 1)
    };
    tracing::debug!(type_name = document.type_name(), count, "Decoded document");

    print_single(&canonical)?;
    if format == OutputFormat::Table {
        print_success(&format!("{count} {} value(s) decoded", document.type_name()));
    }
    Ok(())
}

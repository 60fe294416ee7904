//! Generate command implementation.
//!
//! Runs every configuration entry and writes `{output_file}.h` and
//! `{output_file}.cpp` into the output directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use qlext_codegen::{EntryReport, EntryStatus, Generator};

use crate::cli::OutputFormat;
use crate::commands::{definitions_dir, load_config, load_tables};
use crate::output::{print_header, print_output, print_single, print_success, print_warning};

/// Arguments for the generate command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Generation config (JSON array of entries)
    #[arg(short, long, env = "QLEXT_CONFIG")]
    pub config: PathBuf,

    /// Directory holding the definitions files. Defaults to the config's directory.
    #[arg(short, long)]
    pub definitions_dir: Option<PathBuf>,

    /// Directory receiving the generated files; created if missing
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// TOML mappings layered over the standard lookup tables
    #[arg(short, long, env = "QLEXT_MAPPINGS")]
    pub mappings: Option<PathBuf>,

    /// Render everything but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

/// One row of the summary table.
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    #[tabled(rename = "Struct")]
    struct_name: String,
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Overloads")]
    overloads: usize,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&EntryReport> for EntryRow {
    fn from(report: &EntryReport) -> Self {
        let result = match &report.status {
            EntryStatus::Generated { files } => files
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(", "),
            EntryStatus::Skipped { reason } => format!("skipped: {reason}"),
        };
        Self {
            struct_name: report.struct_name.clone(),
            entity: report.entity.clone().unwrap_or_else(|| "-".to_string()),
            overloads: report.overloads,
            result,
        }
    }
}

/// Execute the generate command.
pub fn execute(args: GenerateArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(&args.config)?;
    let generator = Generator::new(load_tables(args.mappings.as_deref())?);
    let definitions = definitions_dir(&args.config, args.definitions_dir.as_deref());
    tracing::debug!(
        definitions = %definitions.display(),
        output = %args.output_dir.display(),
        entries = config.entries.len(),
        "Starting generation"
    );

    let report = if args.dry_run {
        generator.dry_run(&config, &definitions, &args.output_dir)?
    } else {
        generator.run(&config, &definitions, &args.output_dir)?
    };

    match format {
        OutputFormat::Json => print_single(&report)?,
        OutputFormat::Table | OutputFormat::Csv => {
            let rows: Vec<EntryRow> = report.entries.iter().map(EntryRow::from).collect();
            if format == OutputFormat::Table {
                print_header(if args.dry_run {
                    "Generation Plan (dry run)"
                } else {
                    "Generated Files"
                });
            }
            print_output(&rows, format)?;
            if format == OutputFormat::Table {
                if report.skipped_count() > 0 {
                    print_warning(&format!("{} entries skipped", report.skipped_count()));
                }
                print_success(&format!(
                    "{} of {} entries generated",
                    report.generated_count(),
                    report.entries.len()
                ));
            }
        }
    }

    Ok(())
}

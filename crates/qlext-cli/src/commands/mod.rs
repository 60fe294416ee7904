//! CLI command implementations.

pub mod check;
pub mod generate;
pub mod inspect;
pub mod mappings;

pub use check::CheckArgs;
pub use generate::GenerateArgs;
pub use inspect::InspectArgs;
pub use mappings::MappingsArgs;

use std::path::{Path, PathBuf};

use qlext_codegen::{EntitySchema, EntryConfig, GenerationConfig, Generator, LookupTables};

use crate::error::{CliError, CliResult};

/// Standard tables, or the standard tables overlaid by a mappings file.
pub fn load_tables(mappings: Option<&Path>) -> CliResult<LookupTables> {
    match mappings {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading mappings");
            Ok(LookupTables::from_file(path)?)
        }
        None => Ok(LookupTables::standard()),
    }
}

/// Loads and validates a generation config.
pub fn load_config(path: &Path) -> CliResult<GenerationConfig> {
    Ok(GenerationConfig::from_file(path)?)
}

/// The definitions directory: explicit, else the config file's directory.
pub fn definitions_dir(config: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Reads an entry's definitions and builds its schema.
pub fn entry_schema(
    generator: &Generator,
    entry: &EntryConfig,
    definitions_dir: &Path,
) -> CliResult<Result<EntitySchema, String>> {
    let source = Generator::read_definitions(entry, definitions_dir)?;
    Ok(generator.schema_for(entry, &source)?)
}

/// Like [`entry_schema`], with a skipped entry as an error.
pub fn require_schema(
    generator: &Generator,
    entry: &EntryConfig,
    definitions_dir: &Path,
) -> CliResult<EntitySchema> {
    entry_schema(generator, entry, definitions_dir)?.map_err(|reason| CliError::NothingGenerated {
        struct_name: entry.struct_name.clone(),
        reason,
    })
}

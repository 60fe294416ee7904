//! Generation driver.
//!
//! Runs Parser → Normalizer → Builder → Emitters for each configuration
//! entry in order. An entry's files are written and closed before the next
//! entry starts. The first hard failure aborts the run.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{EntryConfig, GenerationConfig};
use crate::emit::{emit_unit, GeneratedUnit};
use crate::error::{CodegenError, CodegenResult};
use crate::mapping::LookupTables;
use crate::schema::{build_entity_schema, EntitySchema};
use crate::signature::{parse_signatures, SignatureSet};

// =============================================================================
// Outcomes
// =============================================================================

/// Result of generating one entry in memory.
#[derive(Debug, Clone)]
pub enum EntryOutcome {
    /// Files were rendered.
    Generated(GeneratedUnit),
    /// Nothing to generate.
    Skipped {
        /// Why the entry produced no output.
        reason: String,
    },
}

impl EntryOutcome {
    /// The rendered unit, if any.
    pub fn unit(&self) -> Option<&GeneratedUnit> {
        match self {
            EntryOutcome::Generated(unit) => Some(unit),
            EntryOutcome::Skipped { .. } => None,
        }
    }

    /// Returns true if the entry was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, EntryOutcome::Skipped { .. })
    }
}

/// Status of one entry in a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// Files were rendered, and written unless the run was a dry run.
    Generated {
        /// Paths of the header and body.
        files: Vec<PathBuf>,
    },
    /// Nothing was generated.
    Skipped {
        /// Why the entry produced no output.
        reason: String,
    },
}

/// Per-entry line of a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    /// Configured struct name.
    pub struct_name: String,
    /// Entity the structs were generated from.
    pub entity: Option<String>,
    /// Number of overloads found.
    pub overloads: usize,
    /// What happened.
    #[serde(flatten)]
    pub status: EntryStatus,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Entries in configuration order.
    pub entries: Vec<EntryReport>,
    /// False for dry runs.
    pub written: bool,
}

impl RunReport {
    /// Number of entries that produced files.
    pub fn generated_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::Generated { .. }))
            .count()
    }

    /// Number of skipped entries.
    pub fn skipped_count(&self) -> usize {
        self.entries.len() - self.generated_count()
    }

    /// Every file path of generated entries.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().flat_map(|e| match &e.status {
            EntryStatus::Generated { files } => files.iter().map(PathBuf::as_path).collect(),
            EntryStatus::Skipped { .. } => Vec::new(),
        })
    }
}

// =============================================================================
// Generator
// =============================================================================

enum Selection<'s> {
    Found {
        entity: &'s str,
        overloads: &'s [String],
    },
    Missing(String),
}

/// Picks the entity an entry generates from.
fn select_entity<'s>(entry: &EntryConfig, set: &'s SignatureSet) -> CodegenResult<Selection<'s>> {
    if let Some(wanted) = &entry.entity {
        return Ok(match set.iter().find(|(name, _)| *name == wanted.as_str()) {
            Some((entity, overloads)) => Selection::Found { entity, overloads },
            None => Selection::Missing(format!(
                "entity '{wanted}' is not declared in {}",
                entry.definitions_file
            )),
        });
    }

    let mut entities = set.iter();
    match (entities.next(), entities.next()) {
        (None, _) => Ok(Selection::Missing(format!(
            "no constructor declarations in {}",
            entry.definitions_file
        ))),
        (Some((entity, overloads)), None) => Ok(Selection::Found { entity, overloads }),
        _ => Err(CodegenError::AmbiguousEntity {
            struct_name: entry.struct_name.clone(),
            entities: set.entities().map(str::to_string).collect(),
        }),
    }
}

/// Turns configuration entries into generated sources.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    tables: LookupTables,
}

impl Generator {
    /// Creates a generator over the given lookup tables.
    pub fn new(tables: LookupTables) -> Self {
        Self { tables }
    }

    /// The lookup tables in use.
    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    /// Builds the schema of one entry from its definitions text.
    ///
    /// `Ok(Err(reason))` means the entry has nothing to generate.
    pub fn schema_for(
        &self,
        entry: &EntryConfig,
        source_text: &str,
    ) -> CodegenResult<Result<EntitySchema, String>> {
        let set = parse_signatures(source_text);
        let (entity, overloads) = match select_entity(entry, &set)? {
            Selection::Found { entity, overloads } => (entity, overloads),
            Selection::Missing(reason) => return Ok(Err(reason)),
        };
        let schema = build_entity_schema(
            entity,
            &entry.struct_name,
            overloads,
            &entry.extra_fields,
            &self.tables,
        )?;
        Ok(schema.ok_or_else(|| format!("entity '{entity}' has no overloads")))
    }

    /// Generates one entry in memory.
    pub fn generate_entry(
        &self,
        entry: &EntryConfig,
        source_text: &str,
    ) -> CodegenResult<EntryOutcome> {
        match self.schema_for(entry, source_text)? {
            Ok(schema) => Ok(EntryOutcome::Generated(emit_unit(
                entry,
                schema,
                &self.tables,
            ))),
            Err(reason) => Ok(EntryOutcome::Skipped { reason }),
        }
    }

    /// Reads the definitions file of `entry`.
    pub fn read_definitions(entry: &EntryConfig, definitions_dir: &Path) -> CodegenResult<String> {
        let path = definitions_dir.join(&entry.definitions_file);
        std::fs::read_to_string(&path).map_err(|e| CodegenError::io(path, e))
    }

    /// Generates and writes every entry.
    pub fn run(
        &self,
        config: &GenerationConfig,
        definitions_dir: &Path,
        output_dir: &Path,
    ) -> CodegenResult<RunReport> {
        self.execute(config, definitions_dir, output_dir, true)
    }

    /// Generates every entry without touching the output directory.
    pub fn dry_run(
        &self,
        config: &GenerationConfig,
        definitions_dir: &Path,
        output_dir: &Path,
    ) -> CodegenResult<RunReport> {
        self.execute(config, definitions_dir, output_dir, false)
    }

    fn execute(
        &self,
        config: &GenerationConfig,
        definitions_dir: &Path,
        output_dir: &Path,
        write: bool,
    ) -> CodegenResult<RunReport> {
        if write {
            std::fs::create_dir_all(output_dir).map_err(|e| CodegenError::io(output_dir, e))?;
        }

        let mut report = RunReport {
            entries: Vec::with_capacity(config.entries.len()),
            written: write,
        };

        for entry in &config.entries {
            let source = Self::read_definitions(entry, definitions_dir)?;
            let line = match self.generate_entry(entry, &source)? {
                EntryOutcome::Generated(unit) => {
                    let header = output_dir.join(unit.header_name());
                    let body = output_dir.join(unit.body_name());
                    if write {
                        write_file(&header, &unit.header)?;
                        write_file(&body, &unit.body)?;
                    }
                    tracing::info!(
                        struct_name = %entry.struct_name,
                        entity = %unit.schema.entity,
                        overloads = unit.schema.overload_count(),
                        "Generated entry"
                    );
                    EntryReport {
                        struct_name: entry.struct_name.clone(),
                        entity: Some(unit.schema.entity.clone()),
                        overloads: unit.schema.overload_count(),
                        status: EntryStatus::Generated {
                            files: vec![header, body],
                        },
                    }
                }
                EntryOutcome::Skipped { reason } => {
                    tracing::warn!(
                        struct_name = %entry.struct_name,
                        %reason,
                        "Skipped entry"
                    );
                    EntryReport {
                        struct_name: entry.struct_name.clone(),
                        entity: entry.entity.clone(),
                        overloads: 0,
                        status: EntryStatus::Skipped { reason },
                    }
                }
            };
            report.entries.push(line);
        }

        Ok(report)
    }
}

fn write_file(path: &Path, content: &str) -> CodegenResult<()> {
    std::fs::write(path, content).map_err(|e| CodegenError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPOSIT: &str = "
        // deposit helpers
        DepositRateHelper(const Handle<Quote>& rate, const ext::shared_ptr<IborIndex>& i);
        DepositRateHelper(Rate rate, const ext::shared_ptr<IborIndex>& i);
    ";

    fn entry() -> EntryConfig {
        EntryConfig::new("DepositRateHelper", "QlExt", "DepositStructs", "deposit.ctor")
    }

    #[test]
    fn test_generate_entry_with_overloads() {
        let generator = Generator::default();
        let outcome = generator.generate_entry(&entry(), DEPOSIT).unwrap();
        let unit = outcome.unit().unwrap();
        assert_eq!(unit.schema.entity, "DepositRateHelper");
        assert_eq!(unit.schema.overload_count(), 2);
        assert!(unit.header.contains("using DepositRateHelper = std::variant<DepositRateHelperV0,DepositRateHelperV1>;"));
    }

    #[test]
    fn test_no_declarations_is_skipped() {
        let outcome = Generator::default()
            .generate_entry(&entry(), "// nothing here\n")
            .unwrap();
        assert!(outcome.is_skipped());
    }

    #[test]
    fn test_missing_selected_entity_is_skipped() {
        let outcome = Generator::default()
            .generate_entry(&entry().with_entity("FraRateHelper"), DEPOSIT)
            .unwrap();
        match outcome {
            EntryOutcome::Skipped { reason } => assert!(reason.contains("FraRateHelper")),
            EntryOutcome::Generated(_) => panic!("expected skip"),
        }
    }

    #[test]
    fn test_several_entities_need_selection() {
        let text = format!("{DEPOSIT}\nFraRateHelper(Rate rate, Natural months);");
        let err = Generator::default().generate_entry(&entry(), &text).unwrap_err();
        match err {
            CodegenError::AmbiguousEntity { entities, .. } => {
                assert_eq!(entities, vec!["DepositRateHelper", "FraRateHelper"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let outcome = Generator::default()
            .generate_entry(&entry().with_entity("FraRateHelper"), &text)
            .unwrap();
        assert_eq!(outcome.unit().unwrap().schema.entity, "FraRateHelper");
    }

    #[test]
    fn test_unknown_type_is_fatal() {
        let err = Generator::default()
            .generate_entry(&entry(), "DepositRateHelper(Perod tenor);")
            .unwrap_err();
        assert!(matches!(err, CodegenError::UnknownType { .. }));
    }

    #[test]
    fn test_run_writes_files_and_dry_run_does_not() {
        let defs = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(defs.path().join("deposit.ctor"), DEPOSIT).unwrap();
        let config = GenerationConfig::new(vec![entry()]);
        let generator = Generator::default();

        let target = out.path().join("dry");
        let report = generator.dry_run(&config, defs.path(), &target).unwrap();
        assert!(!report.written);
        assert_eq!(report.generated_count(), 1);
        assert!(!target.exists());

        let report = generator.run(&config, defs.path(), out.path()).unwrap();
        assert!(report.written);
        let files: Vec<_> = report.files().collect();
        assert_eq!(files.len(), 2);
        assert!(out.path().join("DepositStructs.h").is_file());
        assert!(out.path().join("DepositStructs.cpp").is_file());
    }

    #[test]
    fn test_missing_definitions_file_reports_path() {
        let defs = tempfile::tempdir().unwrap();
        let config = GenerationConfig::new(vec![entry()]);
        let err = Generator::default()
            .dry_run(&config, defs.path(), defs.path())
            .unwrap_err();
        match err {
            CodegenError::Io { path, .. } => assert!(path.ends_with("deposit.ctor")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

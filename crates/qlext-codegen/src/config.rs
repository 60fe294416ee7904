//! Generation configuration.
//!
//! The configuration is a JSON array with one entry per generated family:
//!
//! ```json
//! [
//!   {
//!     "struct_name": "DepositRateHelper",
//!     "namespace": "QlExt::Structs",
//!     "output_file": "DepositRateHelperStructs",
//!     "definitions_file": "DepositRateHelper.ctor",
//!     "extra_fields": [
//!       { "type": "std::string", "name": "_name_", "value": "\"\"" }
//!     ]
//!   }
//! ]
//! ```
//!
//! The older key spellings `name_space`, `tgt_file_name` and `ctor_file`
//! are accepted as aliases.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult, Validate, ValidationError};
use crate::schema::{TYPE_FIELD, VERSION_FIELD};

/// A field prepended to every generated struct of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraField {
    /// Target-domain type.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Field name.
    pub name: String,
    /// Literal initializer, empty for none.
    #[serde(default)]
    pub value: String,
}

impl ExtraField {
    /// Creates an extra field.
    pub fn new(
        field_type: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field_type: field_type.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One configuration entry: one definitions file, one header/body pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Base name of the generated struct(s).
    pub struct_name: String,
    /// C++ namespace of the generated structs; may be empty.
    #[serde(alias = "name_space", default)]
    pub namespace: String,
    /// Base name of the generated `.h`/`.cpp` files.
    #[serde(alias = "tgt_file_name")]
    pub output_file: String,
    /// Definitions file, relative to the definitions directory.
    #[serde(alias = "ctor_file")]
    pub definitions_file: String,
    /// Entity to generate when the definitions declare several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Fields prepended to every struct, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_fields: Vec<ExtraField>,
}

impl EntryConfig {
    /// Creates an entry without extra fields.
    pub fn new(
        struct_name: impl Into<String>,
        namespace: impl Into<String>,
        output_file: impl Into<String>,
        definitions_file: impl Into<String>,
    ) -> Self {
        Self {
            struct_name: struct_name.into(),
            namespace: namespace.into(),
            output_file: output_file.into(),
            definitions_file: definitions_file.into(),
            entity: None,
            extra_fields: Vec::new(),
        }
    }

    /// Sets the entity to generate.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Appends an extra field.
    pub fn with_extra_field(mut self, field: ExtraField) -> Self {
        self.extra_fields.push(field);
        self
    }

    /// Namespace-qualified name of a generated struct.
    pub fn qualified(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}::{}", self.namespace, name)
        }
    }

    fn validate_at(&self, index: usize) -> Vec<ValidationError> {
        let at = |field: &str| format!("entries[{index}].{field}");
        let mut errors = Vec::new();

        if !is_identifier(&self.struct_name) {
            errors.push(ValidationError::new(
                at("struct_name"),
                format!("'{}' is not a valid identifier", self.struct_name),
            ));
        }
        if !self.namespace.is_empty() && !self.namespace.split("::").all(is_identifier) {
            errors.push(ValidationError::new(
                at("namespace"),
                format!("'{}' is not a valid namespace", self.namespace),
            ));
        }
        if self.output_file.trim().is_empty() {
            errors.push(ValidationError::new(at("output_file"), "must not be empty"));
        }
        if self.definitions_file.trim().is_empty() {
            errors.push(ValidationError::new(at("definitions_file"), "must not be empty"));
        }
        if let Some(entity) = &self.entity {
            if !is_identifier(entity) {
                errors.push(ValidationError::new(
                    at("entity"),
                    format!("'{entity}' is not a valid identifier"),
                ));
            }
        }

        let mut seen = HashSet::new();
        for (i, field) in self.extra_fields.iter().enumerate() {
            let location = at(&format!("extra_fields[{i}]"));
            if !is_identifier(&field.name) {
                errors.push(ValidationError::new(
                    location.clone(),
                    format!("'{}' is not a valid identifier", field.name),
                ));
            }
            if field.name == TYPE_FIELD || field.name == VERSION_FIELD {
                errors.push(ValidationError::new(
                    location.clone(),
                    format!("'{}' is reserved for discriminators", field.name),
                ));
            }
            if field.field_type.trim().is_empty() {
                errors.push(ValidationError::new(location.clone(), "type must not be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                errors.push(ValidationError::new(
                    location,
                    format!("duplicate field '{}'", field.name),
                ));
            }
        }

        errors
    }
}

/// The ordered list of entries driving one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationConfig {
    /// Entries in run order.
    pub entries: Vec<EntryConfig>,
}

impl GenerationConfig {
    /// Creates a configuration from entries.
    pub fn new(entries: Vec<EntryConfig>) -> Self {
        Self { entries }
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Loads and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> CodegenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        let config = Self::from_json_str(&content).map_err(|e| CodegenError::config(path, e))?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Finds an entry by struct name.
    pub fn entry(&self, struct_name: &str) -> CodegenResult<&EntryConfig> {
        self.entries
            .iter()
            .find(|e| e.struct_name == struct_name)
            .ok_or_else(|| CodegenError::EntryNotFound {
                struct_name: struct_name.to_string(),
            })
    }
}

impl Validate for GenerationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = self
            .entries
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| entry.validate_at(i))
            .collect();

        let mut outputs = HashSet::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if !outputs.insert(entry.output_file.as_str()) {
                errors.push(ValidationError::new(
                    format!("entries[{i}].output_file"),
                    format!("'{}' is written by an earlier entry", entry.output_file),
                ));
            }
        }
        errors
    }
}

/// Returns true for a C/C++ identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

//! Error types for the generator.
//!
//! Mapping failures are fatal: an unknown type or default value stops the
//! run so that drift between a definitions file and the lookup tables shows
//! up immediately instead of as broken generated code.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::DecodeError;

/// A specialized Result type for generator operations.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// The main error type for generator operations.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// A declared parameter type has no entry in the type table.
    #[error("Unknown type '{source_type}' for parameter '{parameter}' of {entity}")]
    UnknownType {
        /// Entity whose signature declared the type.
        entity: String,
        /// Parameter name.
        parameter: String,
        /// Source-domain type spelling.
        source_type: String,
    },

    /// A default value expression has no entry in the value table.
    #[error("Unknown default value '{value}' for parameter '{parameter}' of {entity}")]
    UnknownValue {
        /// Entity whose signature declared the default.
        entity: String,
        /// Parameter name.
        parameter: String,
        /// Source-domain default spelling.
        value: String,
    },

    /// A parameter fragment could not be split into type and name.
    #[error("Malformed parameter '{fragment}' in {entity}")]
    MalformedParameter {
        /// Entity whose signature contained the fragment.
        entity: String,
        /// The offending fragment.
        fragment: String,
    },

    /// A definitions file declares several entities and the entry did not pick one.
    #[error("Definitions for '{struct_name}' declare several entities ({}); set `entity` in the entry", .entities.join(", "))]
    AmbiguousEntity {
        /// The configured struct name.
        struct_name: String,
        /// Entities found in the file, in source order.
        entities: Vec<String>,
    },

    /// A lookup by struct name found no configuration entry.
    #[error("No configuration entry for struct '{struct_name}'")]
    EntryNotFound {
        /// The requested struct name.
        struct_name: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Validation {
        /// Individual validation failures.
        errors: Vec<ValidationError>,
    },

    /// Configuration or mappings file could not be parsed.
    #[error("Cannot parse {path}: {message}")]
    Config {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// File system failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Reference codec failure.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl CodegenError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a configuration parse error.
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Location of the failure, e.g. `entries[2].struct_name`.
    pub field: String,
    /// What is wrong.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Trait for validatable configuration.
pub trait Validate {
    /// Returns every validation failure, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> CodegenResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CodegenError::Validation { errors })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_message_names_context() {
        let err = CodegenError::UnknownType {
            entity: "DepositRateHelper".into(),
            parameter: "tenor".into(),
            source_type: "Perod".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Perod"));
        assert!(msg.contains("tenor"));
        assert!(msg.contains("DepositRateHelper"));
    }

    #[test]
    fn test_validation_message_joins_errors() {
        let err = CodegenError::Validation {
            errors: vec![
                ValidationError::new("entries[0].struct_name", "must not be empty"),
                ValidationError::new("entries[1].output_file", "duplicate"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: entries[0].struct_name: must not be empty; entries[1].output_file: duplicate"
        );
    }

    #[test]
    fn test_ambiguous_entity_lists_entities() {
        let err = CodegenError::AmbiguousEntity {
            struct_name: "Helper".into(),
            entities: vec!["A".into(), "B".into()],
        };
        assert!(err.to_string().contains("(A, B)"));
    }
}

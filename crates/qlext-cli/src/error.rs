//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generator failure.
    #[error(transparent)]
    Codegen(#[from] qlext_codegen::CodegenError),

    /// The selected entry generates nothing.
    #[error("Entry {struct_name} generates nothing: {reason}")]
    NothingGenerated {
        /// Configured struct name.
        struct_name: String,
        /// Skip reason.
        reason: String,
    },

    /// A document could not be read or parsed.
    #[error("Cannot read document {path}: {message}")]
    Document {
        /// Document path.
        path: PathBuf,
        /// Reader or parser message.
        message: String,
    },
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

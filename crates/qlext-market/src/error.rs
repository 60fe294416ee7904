//! Market data error types.

use std::path::PathBuf;

use thiserror::Error;

/// Market data operation result type.
pub type MarketResult<T> = Result<T, MarketError>;

/// Market data error types.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Calendar name missing from the index.
    #[error("Calendar {name} was not found in the calendar index")]
    CalendarNotFound {
        /// Upper-cased calendar name.
        name: String,
    },

    /// Builtin calendar spec is not `Class` or `Class.Market`.
    #[error("Invalid builtin calendar spec '{spec}'")]
    InvalidCalendarSpec {
        /// The offending spec.
        spec: String,
    },

    /// Schedule record failed validation.
    #[error("Invalid schedule for {product}: {reason}")]
    InvalidSchedule {
        /// Upper-cased product identifier.
        product: String,
        /// What is wrong.
        reason: String,
    },

    /// A loader could not produce data.
    #[error("Cannot load {id}: {message}")]
    Load {
        /// Calendar name or product identifier.
        id: String,
        /// Loader message.
        message: String,
    },

    /// Malformed calendar index data.
    #[error("Calendar index error: {0}")]
    Index(String),

    /// Unreadable CSV data (index or holiday file).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed date.
    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    /// File system failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A cache lock was poisoned.
    #[error("Lock error: {0}")]
    Lock(String),
}

impl MarketError {
    /// Creates a loader error.
    pub fn load(id: impl Into<String>, message: impl ToString) -> Self {
        Self::Load {
            id: id.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn lock(e: impl std::fmt::Display) -> Self {
        Self::Lock(e.to_string())
    }
}

//! Calendar index: which calendars exist and where they come from.
//!
//! The index file is CSV with two leading header rows followed by
//! `name,builtin,source` rows:
//!
//! ```text
//! Calendar index
//! name,builtin,source
//! NYSE,UnitedStates.NYSE,
//! TARGET,TARGET,
//! CNY_IB,,cny_ib_holidays.csv
//! NONE,,
//! ```
//!
//! Names are case-insensitive and stored upper-cased.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};

const HEADER_ROWS: usize = 2;

/// Where a calendar comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarIndexEntry {
    /// Builtin spec, `Class` or `Class.Market`.
    pub builtin: Option<String>,
    /// Holiday source identifier handed to the calendar loader.
    pub source: Option<String>,
}

impl CalendarIndexEntry {
    /// An entry backed by a builtin calendar.
    pub fn builtin(spec: impl Into<String>) -> Self {
        Self {
            builtin: Some(spec.into()),
            source: None,
        }
    }

    /// An entry backed by loaded holidays.
    pub fn bespoke(source: impl Into<String>) -> Self {
        Self {
            builtin: None,
            source: Some(source.into()),
        }
    }

    /// An entry that resolves to no calendar.
    pub fn none() -> Self {
        Self::default()
    }
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Upper-cased calendar name → index entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarIndex {
    entries: HashMap<String, CalendarIndexEntry>,
}

impl CalendarIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, name: &str, entry: CalendarIndexEntry) {
        self.entries.insert(name.trim().to_uppercase(), entry);
    }

    /// Builder-style [`CalendarIndex::insert`].
    pub fn with_entry(mut self, name: &str, entry: CalendarIndexEntry) -> Self {
        self.insert(name, entry);
        self
    }

    /// Looks up a calendar, ignoring case.
    pub fn get(&self, name: &str) -> Option<&CalendarIndexEntry> {
        self.entries.get(&name.trim().to_uppercase())
    }

    /// Calendar names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads an index from CSV.
    pub fn from_csv_reader<R: Read>(reader: R) -> MarketResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut index = Self::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            if row < HEADER_ROWS {
                continue;
            }
            let Some(name) = non_empty(record.get(0)) else {
                continue;
            };
            if record.len() < 2 {
                return Err(MarketError::Index(format!(
                    "row {} for {name} has no builtin column",
                    row + 1
                )));
            }
            index.insert(
                &name,
                CalendarIndexEntry {
                    builtin: non_empty(record.get(1)),
                    source: non_empty(record.get(2)),
                },
            );
        }
        tracing::debug!(calendars = index.len(), "Loaded calendar index");
        Ok(index)
    }

    /// Reads an index file.
    pub fn from_path(path: impl AsRef<Path>) -> MarketResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| MarketError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_csv_reader(file)
    }
}

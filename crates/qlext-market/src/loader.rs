//! In-memory loaders.
//!
//! Useful for tests and for callers that fetch market data themselves and
//! only want the caching. Identifiers are matched case-insensitively.

use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDate;

use crate::calendar::CalendarLoader;
use crate::dates::read_holiday_csv;
use crate::error::{MarketError, MarketResult};
use crate::schedule::{ScheduleLoader, ScheduleRecord};

fn key(id: &str) -> String {
    id.trim().to_uppercase()
}

/// Holiday lists held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendarLoader {
    holidays: HashMap<String, Vec<NaiveDate>>,
}

impl InMemoryCalendarLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the holidays of a calendar.
    pub fn insert(&mut self, calendar: &str, holidays: Vec<NaiveDate>) {
        self.holidays.insert(key(calendar), holidays);
    }

    /// Builder-style [`InMemoryCalendarLoader::insert`].
    pub fn with_holidays(mut self, calendar: &str, holidays: Vec<NaiveDate>) -> Self {
        self.insert(calendar, holidays);
        self
    }

    /// Adds holidays read from a headerless one-date-per-row CSV document.
    pub fn insert_csv<R: Read>(&mut self, calendar: &str, reader: R) -> MarketResult<usize> {
        let holidays = read_holiday_csv(reader)?;
        let count = holidays.len();
        self.insert(calendar, holidays);
        Ok(count)
    }
}

/// Keyed by calendar name; the index source is not used.
impl CalendarLoader for InMemoryCalendarLoader {
    fn load(&self, calendar: &str, _source: &str) -> MarketResult<Vec<NaiveDate>> {
        self.holidays
            .get(&key(calendar))
            .cloned()
            .ok_or_else(|| MarketError::load(calendar, "no holidays registered"))
    }
}

/// Schedule records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleLoader {
    schedules: HashMap<String, ScheduleRecord>,
}

impl InMemoryScheduleLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the schedule of a product identifier.
    pub fn insert(&mut self, product_id: &str, record: ScheduleRecord) {
        self.schedules.insert(key(product_id), record);
    }

    /// Builder-style [`InMemoryScheduleLoader::insert`].
    pub fn with_schedule(mut self, product_id: &str, record: ScheduleRecord) -> Self {
        self.insert(product_id, record);
        self
    }
}

impl ScheduleLoader for InMemoryScheduleLoader {
    fn load(&self, product_id: &str) -> MarketResult<ScheduleRecord> {
        self.schedules
            .get(&key(product_id))
            .cloned()
            .ok_or_else(|| MarketError::load(product_id, "no schedule registered"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_loader_is_case_insensitive() {
        let mut loader = InMemoryCalendarLoader::new();
        let count = loader.insert_csv("cny_ib", "20241001\n20241002\n".as_bytes()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(loader.load("CNY_IB", "ignored").unwrap().len(), 2);
        assert!(matches!(loader.load("HKD", "cny_ib"), Err(MarketError::Load { .. })));
    }
}

//! Schedule records and their cache.
//!
//! A schedule source returns, per product identifier, the explicit list of
//! schedule dates plus the conventions needed to rebuild the schedule in
//! the pricing library. Records are validated before they are cached.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::deserialize_dates;
use crate::error::{MarketError, MarketResult};

/// Explicit schedule of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Schedule dates, strictly increasing.
    #[serde(deserialize_with = "deserialize_dates")]
    pub dates: Vec<NaiveDate>,
    /// Calendar name, resolved through the calendar index.
    pub calendar: String,
    /// Business day convention for intermediate dates.
    pub rolling: String,
    /// Business day convention for the termination date.
    pub term_rolling: String,
    /// Tenor between dates, e.g. `6M`.
    pub tenor: String,
}

impl ScheduleRecord {
    /// Parses a JSON document.
    pub fn from_json_str(content: &str) -> MarketResult<Self> {
        serde_json::from_str(content).map_err(|e| MarketError::load("schedule", e))
    }

    /// Checks that there are at least two strictly increasing dates.
    pub fn validate(&self, product: &str) -> MarketResult<()> {
        let invalid = |reason: String| MarketError::InvalidSchedule {
            product: product.to_string(),
            reason,
        };
        if self.dates.len() < 2 {
            return Err(invalid(format!(
                "needs at least two dates, found {}",
                self.dates.len()
            )));
        }
        if let Some(pair) = self.dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(invalid(format!(
                "dates are not strictly increasing at {} -> {}",
                pair[0], pair[1]
            )));
        }
        Ok(())
    }

    /// First date.
    pub fn start(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Last date.
    pub fn end(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Source of schedule records.
pub trait ScheduleLoader: Send + Sync {
    /// Loads the schedule of a product identifier.
    fn load(&self, product_id: &str) -> MarketResult<ScheduleRecord>;
}

impl<L: ScheduleLoader + ?Sized> ScheduleLoader for Arc<L> {
    fn load(&self, product_id: &str) -> MarketResult<ScheduleRecord> {
        (**self).load(product_id)
    }
}

/// Caches validated schedules by upper-cased product identifier.
pub struct ScheduleCache<L: ScheduleLoader> {
    loader: RwLock<L>,
    cache: RwLock<HashMap<String, Arc<ScheduleRecord>>>,
}

impl<L: ScheduleLoader> ScheduleCache<L> {
    /// Creates an empty cache.
    pub fn new(loader: L) -> Self {
        Self {
            loader: RwLock::new(loader),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the schedule of `product_id`, loading it on first use.
    pub fn get(&self, product_id: &str) -> MarketResult<Arc<ScheduleRecord>> {
        let key = product_id.trim().to_uppercase();
        if let Some(record) = self.cache.read().map_err(MarketError::lock)?.get(&key) {
            return Ok(Arc::clone(record));
        }

        // held until the insert so a loader swap cannot interleave
        let loader = self.loader.read().map_err(MarketError::lock)?;
        let record = loader.load(&key)?;
        record.validate(&key)?;
        tracing::debug!(product = %key, dates = record.dates.len(), "Loaded schedule");

        let record = Arc::new(record);
        self.cache
            .write()
            .map_err(MarketError::lock)?
            .insert(key, Arc::clone(&record));
        Ok(record)
    }

    /// Replaces the loader and drops every cached schedule.
    pub fn set_loader(&self, loader: L) -> MarketResult<()> {
        let mut current = self.loader.write().map_err(MarketError::lock)?;
        let mut cache = self.cache.write().map_err(MarketError::lock)?;
        *current = loader;
        cache.clear();
        Ok(())
    }

    /// Drops every cached schedule.
    pub fn clear(&self) -> MarketResult<()> {
        self.cache.write().map_err(MarketError::lock)?.clear();
        Ok(())
    }

    /// Number of cached schedules.
    pub fn len(&self) -> MarketResult<usize> {
        Ok(self.cache.read().map_err(MarketError::lock)?.len())
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> MarketResult<bool> {
        self.len().map(|n| n == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemoryScheduleLoader;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(dates: Vec<NaiveDate>) -> ScheduleRecord {
        ScheduleRecord {
            dates,
            calendar: "CNY_IB".to_string(),
            rolling: "ModifiedFollowing".to_string(),
            term_rolling: "ModifiedFollowing".to_string(),
            tenor: "3M".to_string(),
        }
    }

    #[test]
    fn test_json_accepts_both_date_encodings() {
        let rec = ScheduleRecord::from_json_str(
            r#"{"dates": [20240115, "2024-04-15", 20240715],
                "calendar": "CNY_IB", "rolling": "Following",
                "term_rolling": "Unadjusted", "tenor": "3M"}"#,
        )
        .unwrap();
        assert_eq!(rec.dates, vec![ymd(2024, 1, 15), ymd(2024, 4, 15), ymd(2024, 7, 15)]);
        assert_eq!(rec.start(), Some(ymd(2024, 1, 15)));
        assert_eq!(rec.end(), Some(ymd(2024, 7, 15)));
    }

    #[test]
    fn test_bad_json_date_is_an_error() {
        assert!(ScheduleRecord::from_json_str(
            r#"{"dates": [20241341], "calendar": "", "rolling": "", "term_rolling": "", "tenor": ""}"#
        )
        .is_err());
    }

    #[test]
    fn test_validation() {
        assert!(record(vec![ymd(2024, 1, 15), ymd(2024, 4, 15)]).validate("P").is_ok());
        assert!(matches!(
            record(vec![ymd(2024, 1, 15)]).validate("P"),
            Err(MarketError::InvalidSchedule { .. })
        ));
        assert!(record(vec![ymd(2024, 4, 15), ymd(2024, 4, 15)]).validate("P").is_err());
        assert!(record(vec![ymd(2024, 4, 15), ymd(2024, 1, 15)]).validate("P").is_err());
    }

    #[test]
    fn test_cache_uses_upper_cased_keys() {
        let loader = InMemoryScheduleLoader::new()
            .with_schedule("bond-1", record(vec![ymd(2024, 1, 15), ymd(2024, 7, 15)]));
        let cache = ScheduleCache::new(loader);

        let a = cache.get("BOND-1").unwrap();
        let b = cache.get(" bond-1 ").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len().unwrap(), 1);
        assert!(matches!(cache.get("BOND-2"), Err(MarketError::Load { .. })));
    }

    #[test]
    fn test_invalid_records_are_not_cached() {
        let loader = InMemoryScheduleLoader::new().with_schedule("short", record(vec![ymd(2024, 1, 15)]));
        let cache = ScheduleCache::new(loader);
        assert!(cache.get("SHORT").is_err());
        assert!(cache.is_empty().unwrap());

        cache
            .set_loader(InMemoryScheduleLoader::new().with_schedule(
                "short",
                record(vec![ymd(2024, 1, 15), ymd(2025, 1, 15)]),
            ))
            .unwrap();
        assert_eq!(cache.get("short").unwrap().dates.len(), 2);
    }

    #[test]
    fn test_poisoned_loader_lock_is_reported() {
        let cache = Arc::new(ScheduleCache::new(InMemoryScheduleLoader::new()));
        let poisoner = Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.loader.write().unwrap();
            panic!("poison the loader lock");
        })
        .join();
        assert!(matches!(cache.get("BOND-1"), Err(MarketError::Lock(_))));
        assert!(matches!(
            cache.set_loader(InMemoryScheduleLoader::new()),
            Err(MarketError::Lock(_))
        ));
        assert!(cache.is_empty().unwrap());
    }
}

//! Calendar resolution and caching.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};
use crate::index::CalendarIndex;

// =============================================================================
// CALENDARS
// =============================================================================

/// A calendar provided by the pricing library, e.g. `UnitedStates.NYSE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuiltinCalendar {
    /// Calendar class, e.g. `UnitedStates`.
    pub class: String,
    /// Market within the class, e.g. `NYSE`.
    pub market: Option<String>,
}

impl BuiltinCalendar {
    /// Parses `Class` or `Class.Market`.
    pub fn parse(spec: &str) -> MarketResult<Self> {
        let invalid = || MarketError::InvalidCalendarSpec {
            spec: spec.to_string(),
        };
        let mut parts = spec.trim().split('.');
        let class = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let market = match parts.next() {
            Some(m) if !m.is_empty() => Some(m.to_string()),
            Some(_) => return Err(invalid()),
            None => None,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self {
            class: class.to_string(),
            market,
        })
    }
}

impl std::fmt::Display for BuiltinCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.market {
            Some(market) => write!(f, "{}.{}", self.class, market),
            None => write!(f, "{}", self.class),
        }
    }
}

/// A calendar built from loaded holidays, with Saturday and Sunday weekends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BespokeCalendar {
    name: String,
    holidays: BTreeSet<NaiveDate>,
}

impl BespokeCalendar {
    /// Creates a calendar from a holiday list.
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Calendar name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true for Saturdays and Sundays.
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Returns true for a loaded holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Returns true if `date` is neither a weekend day nor a holiday.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !self.is_weekend(date) && !self.is_holiday(date)
    }

    /// Holidays in date order.
    pub fn holidays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.holidays.iter().copied()
    }
}

/// A resolved calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Calendar {
    /// Library calendar.
    Builtin(BuiltinCalendar),
    /// Holiday-list calendar.
    Bespoke(BespokeCalendar),
}

impl Calendar {
    /// Display name of the calendar.
    pub fn name(&self) -> String {
        match self {
            Calendar::Builtin(b) => b.to_string(),
            Calendar::Bespoke(b) => b.name().to_string(),
        }
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Source of holiday lists.
///
/// Calendars are keyed by their upper-cased name. `source` is the locator
/// from the index entry (a URL, a file or a table key); loaders that key
/// their data by calendar name can ignore it.
pub trait CalendarLoader: Send + Sync {
    /// Loads the holidays of `calendar`.
    fn load(&self, calendar: &str, source: &str) -> MarketResult<Vec<NaiveDate>>;
}

impl<L: CalendarLoader + ?Sized> CalendarLoader for Arc<L> {
    fn load(&self, calendar: &str, source: &str) -> MarketResult<Vec<NaiveDate>> {
        (**self).load(calendar, source)
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// Resolves calendar names through the index and caches the result.
///
/// Share it through an `Arc`; every method takes `&self`.
pub struct CalendarCache<L: CalendarLoader> {
    index: CalendarIndex,
    loader: RwLock<L>,
    cache: RwLock<HashMap<String, Arc<Calendar>>>,
}

impl<L: CalendarLoader> CalendarCache<L> {
    /// Creates an empty cache.
    pub fn new(index: CalendarIndex, loader: L) -> Self {
        Self {
            index,
            loader: RwLock::new(loader),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The calendar index.
    pub fn index(&self) -> &CalendarIndex {
        &self.index
    }

    /// Resolves a calendar by name, ignoring case.
    ///
    /// Returns `Ok(None)` for index entries with neither a builtin spec nor a
    /// source. A source takes precedence over a builtin spec.
    pub fn get(&self, name: &str) -> MarketResult<Option<Arc<Calendar>>> {
        let key = name.trim().to_uppercase();
        {
            let cache = self.cache.read().map_err(MarketError::lock)?;
            if let Some(calendar) = cache.get(&key) {
                return Ok(Some(Arc::clone(calendar)));
            }
        }

        let entry = self
            .index
            .get(&key)
            .ok_or_else(|| MarketError::CalendarNotFound { name: key.clone() })?;

        // held until the insert so a loader swap cannot interleave
        let loader = self.loader.read().map_err(MarketError::lock)?;
        let calendar = match (&entry.source, &entry.builtin) {
            (Some(source), _) => {
                let holidays = loader.load(&key, source)?;
                tracing::debug!(calendar = %key, holidays = holidays.len(), "Built bespoke calendar");
                Calendar::Bespoke(BespokeCalendar::new(key.clone(), holidays))
            }
            (None, Some(spec)) => Calendar::Builtin(BuiltinCalendar::parse(spec)?),
            (None, None) => return Ok(None),
        };

        let calendar = Arc::new(calendar);
        self.cache
            .write()
            .map_err(MarketError::lock)?
            .insert(key, Arc::clone(&calendar));
        Ok(Some(calendar))
    }

    /// Replaces the loader and drops every cached calendar.
    pub fn set_loader(&self, loader: L) -> MarketResult<()> {
        let mut current = self.loader.write().map_err(MarketError::lock)?;
        let mut cache = self.cache.write().map_err(MarketError::lock)?;
        *current = loader;
        cache.clear();
        Ok(())
    }

    /// Drops every cached calendar.
    pub fn clear(&self) -> MarketResult<()> {
        self.cache.write().map_err(MarketError::lock)?.clear();
        Ok(())
    }

    /// Number of cached calendars.
    pub fn len(&self) -> MarketResult<usize> {
        Ok(self.cache.read().map_err(MarketError::lock)?.len())
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> MarketResult<bool> {
        self.len().map(|n| n == 0)
    }
}

//! QlExt Market Data Services
//!
//! Calendar and schedule caches with injectable loaders.
//!
//! # Calendars
//!
//! A [`CalendarIndex`] lists the known calendars. Each entry names either a
//! builtin library calendar (`Class` or `Class.Market`) or a holiday source
//! read through a [`CalendarLoader`]; an entry with neither resolves to no
//! calendar. [`CalendarCache`] resolves and caches by upper-cased name.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use qlext_market::prelude::*;
//!
//! let index = CalendarIndex::new()
//!     .with_entry("NYSE", CalendarIndexEntry::builtin("UnitedStates.NYSE"))
//!     .with_entry("CNY_IB", CalendarIndexEntry::bespoke("cny_ib"));
//! let holiday = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
//! let loader = InMemoryCalendarLoader::new().with_holidays("cny_ib", vec![holiday]);
//!
//! let cache = CalendarCache::new(index, loader);
//! let calendar = cache.get("cny_ib").unwrap().unwrap();
//! match calendar.as_ref() {
//!     Calendar::Bespoke(cal) => assert!(!cal.is_business_day(holiday)),
//!     Calendar::Builtin(_) => unreachable!(),
//! }
//! ```
//!
//! # Schedules
//!
//! [`ScheduleCache`] loads a [`ScheduleRecord`] per product identifier
//! through a [`ScheduleLoader`], validates it and caches it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod calendar;
mod dates;
mod error;
mod index;
mod loader;
mod schedule;

pub use calendar::{BespokeCalendar, BuiltinCalendar, Calendar, CalendarCache, CalendarLoader};
pub use dates::{from_compact, parse_date, read_holiday_csv};
pub use error::{MarketError, MarketResult};
pub use index::{CalendarIndex, CalendarIndexEntry};
pub use loader::{InMemoryCalendarLoader, InMemoryScheduleLoader};
pub use schedule::{ScheduleCache, ScheduleLoader, ScheduleRecord};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendar::{Calendar, CalendarCache, CalendarLoader};
    pub use crate::error::{MarketError, MarketResult};
    pub use crate::index::{CalendarIndex, CalendarIndexEntry};
    pub use crate::loader::{InMemoryCalendarLoader, InMemoryScheduleLoader};
    pub use crate::schedule::{ScheduleCache, ScheduleLoader, ScheduleRecord};
}

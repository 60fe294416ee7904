//! Date encodings used by calendar and schedule sources.
//!
//! Sources write dates either as compact `YYYYMMDD` numbers or as ISO
//! `YYYY-MM-DD` strings. Both are accepted wherever a date is read.

use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::error::{MarketError, MarketResult};

/// Converts a compact `YYYYMMDD` number.
pub fn from_compact(value: i64) -> MarketResult<NaiveDate> {
    let invalid = || MarketError::InvalidDate(value.to_string());
    if !(10_000_101..=99_991_231).contains(&value) {
        return Err(invalid());
    }
    let year = i32::try_from(value / 10_000).map_err(|_| invalid())?;
    let month = u32::try_from(value / 100 % 100).map_err(|_| invalid())?;
    let day = u32::try_from(value % 100).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parses `YYYYMMDD` or `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> MarketResult<NaiveDate> {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return from_compact(value);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| MarketError::InvalidDate(text.to_string()))
}

/// Reads holiday dates from the first column of a headerless CSV document.
///
/// Blank rows are skipped.
pub fn read_holiday_csv<R: Read>(reader: R) -> MarketResult<Vec<NaiveDate>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut dates = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        match record.get(0).map(str::trim) {
            Some(cell) if !cell.is_empty() => dates.push(parse_date(cell)?),
            _ => {}
        }
    }
    Ok(dates)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Compact(i64),
    Text(String),
}

impl RawDate {
    fn into_date(self) -> MarketResult<NaiveDate> {
        match self {
            RawDate::Compact(value) => from_compact(value),
            RawDate::Text(text) => parse_date(&text),
        }
    }
}

/// Serde helper for a list of dates in either encoding.
pub(crate) fn deserialize_dates<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<RawDate>::deserialize(deserializer)?
        .into_iter()
        .map(|raw| raw.into_date().map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compact_dates() {
        assert_eq!(from_compact(20240101).unwrap(), ymd(2024, 1, 1));
        assert!(from_compact(20240230).is_err());
        assert!(from_compact(2024).is_err());
    }

    #[test]
    fn test_parse_both_encodings() {
        assert_eq!(parse_date("20241225").unwrap(), ymd(2024, 12, 25));
        assert_eq!(parse_date(" 2024-12-25 ").unwrap(), ymd(2024, 12, 25));
        assert!(matches!(parse_date("25/12/2024"), Err(MarketError::InvalidDate(_))));
    }

    #[test]
    fn test_holiday_csv() {
        let data = "20240101\n\n20241225,Christmas\n";
        let dates = read_holiday_csv(data.as_bytes()).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 12, 25)]);
    }

    #[test]
    fn test_unreadable_holiday_csv_is_a_csv_error() {
        let err = read_holiday_csv(&[0xff, 0xfe, b'\n'][..]).unwrap_err();
        assert!(matches!(err, MarketError::Csv(_)));
        assert!(!err.to_string().contains("index"));
    }
}

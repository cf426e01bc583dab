//! Canonical calendar-day handling.
//!
//! Every day that enters the ledger (rental bounds, day-offs, payment dates)
//! is reduced to a [`NaiveDate`], whose serde form is the `YYYY-MM-DD` string
//! used for storage and comparison. Time-of-day components are dropped, never
//! shifted into a neighbouring day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::{EngineError, EngineResult};

/// The storage format of a canonical day.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Values that denote a single calendar day.
///
/// Implementations return the calendar day as seen by the value itself: a zoned
/// timestamp yields the date in its own offset, a naive timestamp yields its
/// date part. Two values on the same calendar day always agree regardless of
/// their time-of-day.
///
/// # Example
///
/// ```
/// use rental_ledger::models::ToCalendarDay;
/// use chrono::{FixedOffset, NaiveDate, TimeZone};
///
/// let late_evening = FixedOffset::east_opt(4 * 3600)
///     .unwrap()
///     .with_ymd_and_hms(2024, 1, 5, 23, 30, 0)
///     .unwrap();
/// assert_eq!(
///     late_evening.calendar_day(),
///     NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
/// );
/// ```
pub trait ToCalendarDay {
    /// Returns the calendar day this value falls on.
    fn calendar_day(&self) -> NaiveDate;
}

impl ToCalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl ToCalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> ToCalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Formats a day in its canonical `YYYY-MM-DD` form.
pub fn canonical_day(day: impl ToCalendarDay) -> String {
    day.calendar_day().format(DAY_FORMAT).to_string()
}

/// Parses a day from its wire form.
///
/// Accepts the canonical `YYYY-MM-DD` form as well as RFC 3339 and naive ISO
/// timestamps, in which case the date as written is kept.
///
/// # Example
///
/// ```
/// use rental_ledger::models::parse_day;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// assert_eq!(parse_day("2024-01-05").unwrap(), expected);
/// assert_eq!(parse_day("2024-01-05T23:59:00+05:00").unwrap(), expected);
/// assert_eq!(parse_day("2024-01-05T00:00:00").unwrap(), expected);
/// assert!(parse_day("05/01/2024").is_err());
/// ```
pub fn parse_day(value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();

    if let Ok(day) = NaiveDate::parse_from_str(trimmed, DAY_FORMAT) {
        return Ok(day);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.calendar_day());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.calendar_day());
    }

    Err(EngineError::InvalidDay {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_canonical_day_is_zero_padded() {
        assert_eq!(canonical_day(date(2024, 3, 7)), "2024-03-07");
    }

    #[test]
    fn test_time_of_day_does_not_change_calendar_day() {
        let morning = date(2024, 1, 5).and_hms_opt(0, 0, 1).unwrap();
        let night = date(2024, 1, 5).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(canonical_day(morning), canonical_day(night));
    }

    #[test]
    fn test_zoned_value_keeps_its_own_calendar_day() {
        // Local midnight east of UTC is still the previous day in UTC; the
        // canonical day must follow the value's own offset.
        let offset = FixedOffset::east_opt(4 * 3600).unwrap();
        let local_midnight = offset.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap();
        assert_eq!(canonical_day(local_midnight), "2024-01-06");
        assert_eq!(canonical_day(local_midnight.with_timezone(&Utc)), "2024-01-05");
    }

    #[test]
    fn test_parse_day_round_trips_canonical_form() {
        let day = date(2024, 12, 31);
        assert_eq!(parse_day(&canonical_day(day)).unwrap(), day);
    }

    #[test]
    fn test_parse_day_trims_whitespace() {
        assert_eq!(parse_day(" 2024-02-29 ").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_parse_day_rejects_impossible_date() {
        let result = parse_day("2023-02-29");
        match result {
            Err(EngineError::InvalidDay { value }) => assert_eq!(value, "2023-02-29"),
            other => panic!("Expected InvalidDay, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_form_matches_canonical_day() {
        let day = date(2024, 1, 5);
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, format!("\"{}\"", canonical_day(day)));
    }
}

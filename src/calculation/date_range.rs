//! Day-granular interval math.
//!
//! All bounds are inclusive calendar days. An open-ended range ends at the
//! supplied "today".

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{EngineError, EngineResult};

/// Returns the number of days from `from` to `to`, counting both ends.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRange`] if `from` is after `to`.
///
/// # Example
///
/// ```
/// use rental_ledger::calculation::days_between_inclusive;
/// use chrono::NaiveDate;
///
/// let jan_1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let jan_10 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// assert_eq!(days_between_inclusive(jan_1, jan_10).unwrap(), 10);
/// assert_eq!(days_between_inclusive(jan_1, jan_1).unwrap(), 1);
/// assert!(days_between_inclusive(jan_10, jan_1).is_err());
/// ```
pub fn days_between_inclusive(from: NaiveDate, to: NaiveDate) -> EngineResult<i64> {
    if from > to {
        return Err(EngineError::InvalidRange { from, to });
    }
    Ok((to - from).num_days() + 1)
}

/// Returns true if `day` lies within `[start, end]`, where a missing end means
/// `today`.
///
/// Both boundaries are members of the range.
///
/// # Example
///
/// ```
/// use rental_ledger::calculation::is_within;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// assert!(is_within(today, start, None, today));
/// assert!(!is_within(today.succ_opt().unwrap(), start, None, today));
/// ```
pub fn is_within(day: NaiveDate, start: NaiveDate, end: Option<NaiveDate>, today: NaiveDate) -> bool {
    day >= start && day <= end.unwrap_or(today)
}

/// Returns the first day of the month containing `day`.
pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Returns the last day of the month containing `day`.
pub fn month_end(day: NaiveDate) -> NaiveDate {
    let first = month_start(day);
    let next_month = first
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    next_month.pred_opt().unwrap_or(next_month)
}

/// Iterates every day of the month containing `day`, in order.
pub fn days_of_month(day: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let last = month_end(day);
    month_start(day).iter_days().take_while(move |d| *d <= last)
}

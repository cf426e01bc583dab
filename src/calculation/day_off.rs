//! Day-off register.
//!
//! Writes are tolerant: a day outside the rental window may be marked and is
//! simply inert until the window grows to include it. The month calendar is
//! where out-of-window days are presented as not toggleable.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{CalendarDay, Technique, ToCalendarDay};

use super::accrual::effective_end;
use super::date_range::{days_of_month, is_within};

/// Flips membership of `day`: removes it if present, otherwise adds it.
///
/// Toggling the same day twice restores the original set.
///
/// # Example
///
/// ```
/// use rental_ledger::calculation::toggle_day_off;
/// use chrono::NaiveDate;
/// use std::collections::BTreeSet;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let once = toggle_day_off(&BTreeSet::new(), day);
/// assert!(once.contains(&day));
/// assert!(toggle_day_off(&once, day).is_empty());
/// ```
pub fn toggle_day_off(day_offs: &BTreeSet<NaiveDate>, day: impl ToCalendarDay) -> BTreeSet<NaiveDate> {
    let day = day.calendar_day();
    let mut updated = day_offs.clone();
    if !updated.remove(&day) {
        updated.insert(day);
    }
    updated
}

/// Marks `day` as a day-off. A no-op if it is already marked.
pub fn add_day_off(day_offs: &BTreeSet<NaiveDate>, day: impl ToCalendarDay) -> BTreeSet<NaiveDate> {
    let mut updated = day_offs.clone();
    updated.insert(day.calendar_day());
    updated
}

/// Unmarks `day`. A no-op if it is not marked.
pub fn remove_day_off(day_offs: &BTreeSet<NaiveDate>, day: impl ToCalendarDay) -> BTreeSet<NaiveDate> {
    let mut updated = day_offs.clone();
    updated.remove(&day.calendar_day());
    updated
}

/// Lays out the month containing `month` for a rental.
///
/// Days before the start or after the effective end are flagged as outside the
/// period. Day-off flags are reported for every day, in or out of the period.
pub fn month_calendar(technique: &Technique, month: NaiveDate, today: NaiveDate) -> Vec<CalendarDay> {
    days_of_month(month)
        .map(|date| CalendarDay {
            date,
            in_period: is_within(date, technique.start_date, technique.end_date(), today),
            is_day_off: technique.has_day_off(date),
            is_today: date == today,
        })
        .collect()
}

/// Returns the day-offs that currently count against billing, in order.
pub fn day_offs_in_period(technique: &Technique, today: NaiveDate) -> Vec<NaiveDate> {
    let end = effective_end(technique, today);
    if technique.start_date > end {
        return Vec::new();
    }
    technique
        .day_offs
        .range(technique.start_date..=end)
        .copied()
        .collect()
}

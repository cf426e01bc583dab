//! Day-granular clocks.
//!
//! Ongoing rentals end at "today", so every derived figure depends on the
//! current day. Callers pass a [`Clock`] rather than reading the system time,
//! which keeps the engines deterministic under test.

use chrono::{Local, NaiveDate};

/// A source of the current calendar day.
pub trait Clock: Send + Sync {
    /// Returns the current calendar day in the reference timezone.
    fn today(&self) -> NaiveDate;
}

/// The process-local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one day.
///
/// # Example
///
/// ```
/// use rental_ledger::clock::{Clock, FixedClock};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// assert_eq!(FixedClock::new(day).today(), day);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    /// Creates a clock that always reports `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_never_moves() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let clock = FixedClock::new(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.today(), day);
    }

    #[test]
    fn test_clocks_are_object_safe() {
        let clocks: Vec<Box<dyn Clock>> = vec![
            Box::new(SystemClock),
            Box::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
        ];
        assert_eq!(clocks.len(), 2);
    }
}

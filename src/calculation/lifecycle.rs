//! Technique lifecycle.
//!
//! A technique starts `Active` and moves to `Ended` when an end date is set,
//! either through [`end_technique`] or an update. Clearing the end date
//! reopens it. Every transition checks the rental window first and returns a
//! new snapshot only when the whole change is legal; the input is never
//! modified. Day-offs pass through untouched.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::{NewTechnique, RentalStatus, Technique, TechniqueUpdate};

/// Builds a new technique from validated input.
///
/// The status is `Active` unless an end date is supplied, and the day-off set
/// starts empty.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDateRange`] if the end date is before the
/// start date.
pub fn create_technique(
    input: NewTechnique,
    id: impl Into<String>,
    created_at: DateTime<Utc>,
) -> EngineResult<Technique> {
    if let Some(end) = input.end_date {
        check_window(input.start_date, end)?;
    }

    Ok(Technique {
        id: id.into(),
        name: input.name.trim().to_string(),
        description: normalize_text(input.description),
        monthly_rent: input.monthly_rent,
        planned_working_days: input.planned_working_days,
        start_date: input.start_date,
        status: RentalStatus::from_end_date(input.end_date),
        day_offs: Default::default(),
        created_at,
        version: 0,
    })
}

/// Applies a partial update to a technique.
///
/// Setting `end_date` ends the rental; setting it to null reopens it. The
/// resulting window must satisfy `start <= effective end`, where an ongoing
/// rental ends at `today`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDateRange`] if the updated window would end
/// before it starts. The technique is left as it was.
///
/// # Example
///
/// ```
/// use rental_ledger::calculation::{create_technique, update_technique};
/// use rental_ledger::models::{NewTechnique, TechniqueUpdate};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
///
/// let technique = create_technique(
///     NewTechnique {
///         name: "Excavator".to_string(),
///         monthly_rent: Decimal::from(15000),
///         planned_working_days: 26,
///         start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
///         end_date: None,
///         description: None,
///     },
///     "tech_001",
///     Utc::now(),
/// )
/// .unwrap();
///
/// let too_early = TechniqueUpdate {
///     end_date: Some(NaiveDate::from_ymd_opt(2024, 1, 5)),
///     ..Default::default()
/// };
/// let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
/// assert!(update_technique(&technique, &too_early, today).is_err());
/// ```
pub fn update_technique(
    technique: &Technique,
    update: &TechniqueUpdate,
    today: NaiveDate,
) -> EngineResult<Technique> {
    let start_date = update.start_date.unwrap_or(technique.start_date);
    let status = match update.end_date {
        Some(end_date) => RentalStatus::from_end_date(end_date),
        None => technique.status,
    };

    let start_moved = start_date != technique.start_date;
    match status {
        RentalStatus::Ended { end_date } => check_window(start_date, end_date)?,
        RentalStatus::Active if start_moved => check_window(start_date, today)?,
        RentalStatus::Active => {}
    }

    let mut updated = technique.clone();
    if let Some(name) = &update.name {
        updated.name = name.trim().to_string();
    }
    if let Some(description) = &update.description {
        updated.description = normalize_text(description.clone());
    }
    if let Some(rent) = update.monthly_rent {
        updated.monthly_rent = rent;
    }
    if let Some(days) = update.planned_working_days {
        updated.planned_working_days = days;
    }
    updated.start_date = start_date;
    updated.status = status;
    Ok(updated)
}

/// Ends a rental on `end_date`, or on `today` when none is given.
///
/// Ending an already ended rental moves its end date.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDateRange`] if the end falls before the start.
pub fn end_technique(
    technique: &Technique,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> EngineResult<Technique> {
    let end_date = end_date.unwrap_or(today);
    check_window(technique.start_date, end_date)?;

    Ok(Technique {
        status: RentalStatus::Ended { end_date },
        ..technique.clone()
    })
}

fn check_window(start: NaiveDate, end: NaiveDate) -> EngineResult<()> {
    if end < start {
        return Err(EngineError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Trims free text, treating blank values as absent.
pub(crate) fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_technique(end_date: Option<NaiveDate>) -> NewTechnique {
        NewTechnique {
            name: "  Excavator ".to_string(),
            monthly_rent: Decimal::from(15000),
            planned_working_days: 26,
            start_date: date(2024, 1, 1),
            end_date,
            description: Some("   ".to_string()),
        }
    }

    fn create_active() -> Technique {
        let mut technique = create_technique(new_technique(None), "tech_001", Utc::now()).unwrap();
        technique.day_offs.insert(date(2024, 1, 5));
        technique
    }

    #[test]
    fn test_create_is_active_with_no_day_offs() {
        let technique = create_technique(new_technique(None), "tech_001", Utc::now()).unwrap();
        assert!(technique.is_active());
        assert!(technique.day_offs.is_empty());
        assert_eq!(technique.name, "Excavator");
        assert_eq!(technique.description, None);
        assert_eq!(technique.version, 0);
    }

    #[test]
    fn test_create_with_end_date_is_ended() {
        let technique =
            create_technique(new_technique(Some(date(2024, 1, 31))), "tech_001", Utc::now()).unwrap();
        assert_eq!(technique.end_date(), Some(date(2024, 1, 31)));
    }

    #[test]
    fn test_create_with_end_before_start_fails() {
        let result = create_technique(new_technique(Some(date(2023, 12, 31))), "tech_001", Utc::now());
        assert!(matches!(result, Err(EngineError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_end_defaults_to_today() {
        let technique = create_active();
        let ended = end_technique(&technique, None, date(2024, 1, 20)).unwrap();
        assert_eq!(ended.status, RentalStatus::Ended { end_date: date(2024, 1, 20) });
        assert_eq!(ended.day_offs, technique.day_offs);
    }

    #[test]
    fn test_end_on_start_day_is_allowed() {
        let technique = create_active();
        let ended = end_technique(&technique, Some(date(2024, 1, 1)), date(2024, 1, 20)).unwrap();
        assert_eq!(ended.end_date(), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_end_before_start_is_rejected_and_technique_unchanged() {
        let technique = create_active();
        let snapshot = technique.clone();
        match end_technique(&technique, Some(date(2023, 12, 25)), date(2024, 1, 20)) {
            Err(EngineError::InvalidDateRange { start, end }) => {
                assert_eq!(start, date(2024, 1, 1));
                assert_eq!(end, date(2023, 12, 25));
            }
            other => panic!("Expected InvalidDateRange, got {:?}", other),
        }
        assert_eq!(technique, snapshot);
    }

    #[test]
    fn test_update_clearing_end_date_reopens() {
        let technique = end_technique(&create_active(), Some(date(2024, 1, 10)), date(2024, 1, 10)).unwrap();
        let update = TechniqueUpdate {
            end_date: Some(None),
            ..Default::default()
        };
        let reopened = update_technique(&technique, &update, date(2024, 2, 1)).unwrap();
        assert!(reopened.is_active());
        assert_eq!(reopened.day_offs, technique.day_offs);
    }

    #[test]
    fn test_update_setting_end_date_ends() {
        let update = TechniqueUpdate {
            end_date: Some(Some(date(2024, 1, 15))),
            ..Default::default()
        };
        let ended = update_technique(&create_active(), &update, date(2024, 1, 20)).unwrap();
        assert_eq!(ended.end_date(), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let technique = create_active();
        let update = TechniqueUpdate {
            name: Some("Crane".to_string()),
            end_date: Some(Some(date(2023, 6, 1))),
            ..Default::default()
        };
        assert!(update_technique(&technique, &update, date(2024, 1, 20)).is_err());
        assert_eq!(technique.name, "Excavator");
    }

    #[test]
    fn test_update_moving_start_past_end_is_rejected() {
        let technique = end_technique(&create_active(), Some(date(2024, 1, 10)), date(2024, 1, 10)).unwrap();
        let update = TechniqueUpdate {
            start_date: Some(date(2024, 1, 11)),
            ..Default::default()
        };
        assert!(matches!(
            update_technique(&technique, &update, date(2024, 2, 1)),
            Err(EngineError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_update_moving_active_start_past_today_is_rejected() {
        let update = TechniqueUpdate {
            start_date: Some(date(2024, 1, 21)),
            ..Default::default()
        };
        assert!(update_technique(&create_active(), &update, date(2024, 1, 20)).is_err());
    }

    #[test]
    fn test_update_metadata_in_ended_state() {
        let technique = end_technique(&create_active(), Some(date(2024, 1, 10)), date(2024, 1, 10)).unwrap();
        let update = TechniqueUpdate {
            name: Some(" Loader ".to_string()),
            monthly_rent: Some(Decimal::from(9000)),
            planned_working_days: Some(22),
            description: Some(Some("Wheel loader".to_string())),
            ..Default::default()
        };
        let updated = update_technique(&technique, &update, date(2024, 3, 1)).unwrap();
        assert_eq!(updated.name, "Loader");
        assert_eq!(updated.monthly_rent, Decimal::from(9000));
        assert_eq!(updated.planned_working_days, 22);
        assert_eq!(updated.description.as_deref(), Some("Wheel loader"));
        assert_eq!(updated.end_date(), Some(date(2024, 1, 10)));
    }

    #[test]
    fn test_update_can_clear_description() {
        let mut technique = create_active();
        technique.description = Some("Old".to_string());
        let update = TechniqueUpdate {
            description: Some(None),
            ..Default::default()
        };
        let updated = update_technique(&technique, &update, date(2024, 1, 20)).unwrap();
        assert_eq!(updated.description, None);
    }
}

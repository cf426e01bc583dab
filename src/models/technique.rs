//! Technique model and related types.
//!
//! A technique is a rented piece of equipment billed at a prorated daily rate.
//! This module defines the [`Technique`] snapshot, its [`RentalStatus`], and the
//! request shapes used to create and update one.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// The lifecycle state of a rental.
///
/// An ended rental always carries its end date, so the status and the end of
/// the rental window cannot disagree. On the wire the variant is written as a
/// `status` tag next to an optional `end_date` field.
///
/// # Example
///
/// ```
/// use rental_ledger::models::RentalStatus;
/// use chrono::NaiveDate;
///
/// let ended = RentalStatus::Ended {
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
/// };
/// assert!(!ended.is_active());
/// assert_eq!(ended.end_date(), NaiveDate::from_ymd_opt(2024, 1, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RentalStatus {
    /// The rental is ongoing; its window ends at "today".
    Active,
    /// The rental ended on the given (inclusive) day.
    Ended {
        /// The last billable day of the rental.
        end_date: NaiveDate,
    },
}

impl RentalStatus {
    /// Returns true for an ongoing rental.
    pub fn is_active(&self) -> bool {
        matches!(self, RentalStatus::Active)
    }

    /// Returns the end date of an ended rental.
    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            RentalStatus::Active => None,
            RentalStatus::Ended { end_date } => Some(*end_date),
        }
    }

    /// Builds the status implied by an optional end date.
    pub fn from_end_date(end_date: Option<NaiveDate>) -> Self {
        match end_date {
            Some(end_date) => RentalStatus::Ended { end_date },
            None => RentalStatus::Active,
        }
    }

    /// The tag written to storage (`"active"` or `"ended"`).
    pub fn label(&self) -> &'static str {
        match self {
            RentalStatus::Active => "active",
            RentalStatus::Ended { .. } => "ended",
        }
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RentalStatus::Active => write!(f, "active"),
            RentalStatus::Ended { end_date } => write!(f, "ended on {}", end_date),
        }
    }
}

/// A rented asset under a billing agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    /// Unique identifier for the technique.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The fixed monthly rent.
    pub monthly_rent: Decimal,
    /// Planned working days per month; the denominator of the daily rate.
    pub planned_working_days: u32,
    /// First billable day of the rental (inclusive).
    pub start_date: NaiveDate,
    /// Active or ended, with the end date when ended.
    #[serde(flatten)]
    pub status: RentalStatus,
    /// Days excluded from billing. Entries outside the rental window are kept
    /// but do not count.
    #[serde(default)]
    pub day_offs: BTreeSet<NaiveDate>,
    /// When the technique was created.
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency version, bumped by the store on every write.
    #[serde(default)]
    pub version: u64,
}

impl Technique {
    /// Returns the end date of the rental, if it has ended.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.status.end_date()
    }

    /// Returns true if the rental is ongoing.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true if the given day is marked as a day-off, whether or not it
    /// currently falls within the rental window.
    pub fn has_day_off(&self, day: NaiveDate) -> bool {
        self.day_offs.contains(&day)
    }
}

/// Fields supplied when adding a technique.
///
/// The identifier, creation time, status and day-off set are assigned by the
/// lifecycle; a supplied `end_date` schedules the end of the rental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTechnique {
    /// Display name.
    pub name: String,
    /// The fixed monthly rent.
    pub monthly_rent: Decimal,
    /// Planned working days per month.
    pub planned_working_days: u32,
    /// First billable day.
    pub start_date: NaiveDate,
    /// Optional last billable day.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A partial update of a technique.
///
/// Absent fields are left untouched. `end_date` and `description` distinguish
/// "not supplied" (`None`) from "clear it" (`Some(None)`); clearing the end
/// date reopens an ended rental.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechniqueUpdate {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New or cleared description.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    /// New monthly rent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rent: Option<Decimal>,
    /// New planned working days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_working_days: Option<u32>,
    /// New start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// New end date, or `Some(None)` to reopen the rental.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<NaiveDate>>,
}

impl TechniqueUpdate {
    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == TechniqueUpdate::default()
    }
}

/// Deserializes a present-but-null field as `Some(None)`.
///
/// Combined with `#[serde(default)]`, a missing field stays `None`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_technique(status: RentalStatus) -> Technique {
        Technique {
            id: "tech_001".to_string(),
            name: "Excavator".to_string(),
            description: None,
            monthly_rent: Decimal::from_str("15000").unwrap(),
            planned_working_days: 26,
            start_date: date(2024, 1, 1),
            status,
            day_offs: BTreeSet::new(),
            created_at: DateTime::parse_from_rfc3339("2024-01-01T08:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            version: 0,
        }
    }

    #[test]
    fn test_serialize_active_technique_has_status_tag_and_no_end_date() {
        let technique = create_test_technique(RentalStatus::Active);
        let json = serde_json::to_value(&technique).unwrap();
        assert_eq!(json["status"], "active");
        assert!(json.get("end_date").is_none());
        assert_eq!(json["monthly_rent"], "15000");
    }

    #[test]
    fn test_serialize_ended_technique_writes_end_date() {
        let technique = create_test_technique(RentalStatus::Ended {
            end_date: date(2024, 1, 5),
        });
        let json = serde_json::to_value(&technique).unwrap();
        assert_eq!(json["status"], "ended");
        assert_eq!(json["end_date"], "2024-01-05");
    }

    #[test]
    fn test_deserialize_technique_with_day_offs() {
        let json = r#"{
            "id": "tech_002",
            "name": "Crane",
            "monthly_rent": "30000.50",
            "planned_working_days": 22,
            "start_date": "2024-02-01",
            "status": "ended",
            "end_date": "2024-02-20",
            "day_offs": ["2024-02-10", "2024-02-03", "2024-02-10"],
            "created_at": "2024-02-01T09:00:00Z"
        }"#;

        let technique: Technique = serde_json::from_str(json).unwrap();
        assert_eq!(technique.monthly_rent, Decimal::from_str("30000.50").unwrap());
        assert_eq!(technique.end_date(), Some(date(2024, 2, 20)));
        assert_eq!(technique.day_offs.len(), 2);
        assert_eq!(
            technique.day_offs.iter().next().copied(),
            Some(date(2024, 2, 3))
        );
        assert_eq!(technique.version, 0);
    }

    #[test]
    fn test_serialize_round_trip_preserves_technique() {
        let mut technique = create_test_technique(RentalStatus::Ended {
            end_date: date(2024, 3, 1),
        });
        technique.day_offs.insert(date(2024, 1, 6));
        technique.description = Some("Tracked, 20t".to_string());

        let json = serde_json::to_string(&technique).unwrap();
        let restored: Technique = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, technique);
    }

    #[test]
    fn test_status_from_end_date() {
        assert_eq!(RentalStatus::from_end_date(None), RentalStatus::Active);
        assert_eq!(
            RentalStatus::from_end_date(Some(date(2024, 1, 5))).label(),
            "ended"
        );
    }

    #[test]
    fn test_update_distinguishes_missing_from_null_end_date() {
        let missing: TechniqueUpdate = serde_json::from_str(r#"{"name": "Loader"}"#).unwrap();
        assert_eq!(missing.end_date, None);

        let cleared: TechniqueUpdate = serde_json::from_str(r#"{"end_date": null}"#).unwrap();
        assert_eq!(cleared.end_date, Some(None));

        let set: TechniqueUpdate =
            serde_json::from_str(r#"{"end_date": "2024-01-31"}"#).unwrap();
        assert_eq!(set.end_date, Some(Some(date(2024, 1, 31))));
    }

    #[test]
    fn test_empty_update_is_empty() {
        assert!(TechniqueUpdate::default().is_empty());
        let update = TechniqueUpdate {
            planned_working_days: Some(20),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}

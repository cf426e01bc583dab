//! Worker model and related types.
//!
//! Workers are paid from the shared fund and may carry a monthly salary
//! target and free-text notes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::technique::double_option;

/// A free-text annotation owned by a single worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerNote {
    /// Unique identifier for the note.
    pub id: String,
    /// Optional short title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The note body.
    pub content: String,
    /// When the note was written.
    pub created_at: DateTime<Utc>,
}

/// An employee paid from the shared fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// The worker's full name.
    pub full_name: String,
    /// Job title or role.
    pub position: String,
    /// Monthly salary target; payment status is `None` without one.
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional photo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// When the worker was added.
    pub created_at: DateTime<Utc>,
    /// Notes attached to the worker, oldest first.
    #[serde(default)]
    pub notes: Vec<WorkerNote>,
    /// Optimistic-concurrency version, bumped by the store on every write.
    #[serde(default)]
    pub version: u64,
}

impl Worker {
    /// Finds a note by its identifier.
    pub fn note(&self, note_id: &str) -> Option<&WorkerNote> {
        self.notes.iter().find(|n| n.id == note_id)
    }
}

/// Fields supplied when adding a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorker {
    /// The worker's full name.
    pub full_name: String,
    /// Job title or role.
    pub position: String,
    /// Optional monthly salary target.
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional photo URL; an empty string means no photo.
    #[serde(default)]
    pub photo: Option<String>,
}

/// A partial update of a worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerUpdate {
    /// New full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// New position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// New or cleared salary target.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub monthly_salary: Option<Option<Decimal>>,
    /// New or cleared description.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    /// New or cleared photo URL.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo: Option<Option<String>>,
}

/// Fields supplied when adding a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkerNote {
    /// Optional short title.
    #[serde(default)]
    pub title: Option<String>,
    /// The note body.
    pub content: String,
}

/// A partial update of a note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerNoteUpdate {
    /// New or cleared title.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<Option<String>>,
    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_worker_without_salary() {
        let json = r#"{
            "id": "wrk_001",
            "full_name": "Aysel Mammadova",
            "position": "Operator",
            "created_at": "2024-01-01T08:00:00Z"
        }"#;

        let worker: Worker = serde_json::from_str(json).unwrap();
        assert_eq!(worker.monthly_salary, None);
        assert!(worker.notes.is_empty());
        assert_eq!(worker.version, 0);
    }

    #[test]
    fn test_deserialize_worker_with_notes() {
        let json = r#"{
            "id": "wrk_002",
            "full_name": "Rashad Aliyev",
            "position": "Driver",
            "monthly_salary": "5000",
            "created_at": "2024-01-01T08:00:00Z",
            "notes": [
                {"id": "note_1", "content": "Prefers morning shifts", "created_at": "2024-01-02T10:00:00Z"}
            ]
        }"#;

        let worker: Worker = serde_json::from_str(json).unwrap();
        assert_eq!(worker.monthly_salary, Some(Decimal::from_str("5000").unwrap()));
        assert_eq!(
            worker.note("note_1").map(|n| n.content.as_str()),
            Some("Prefers morning shifts")
        );
        assert!(worker.note("missing").is_none());
    }

    #[test]
    fn test_worker_update_clears_salary_with_null() {
        let update: WorkerUpdate = serde_json::from_str(r#"{"monthly_salary": null}"#).unwrap();
        assert_eq!(update.monthly_salary, Some(None));

        let untouched: WorkerUpdate = serde_json::from_str(r#"{"position": "Foreman"}"#).unwrap();
        assert_eq!(untouched.monthly_salary, None);
    }
}

//! Input validation for mutation requests.
//!
//! Every create and update shape implements [`Validate`]. Failures are
//! collected per field: the first message recorded for a field wins, and all
//! fields are checked so a caller can report every problem at once.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ValidationLimits;
use crate::models::{
    NewPayment, NewTechnique, NewWorker, NewWorkerNote, TechniqueUpdate, WorkerNoteUpdate,
    WorkerUpdate,
};

/// Validation failures keyed by field path.
///
/// # Example
///
/// ```
/// use rental_ledger::validation::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("name", "Technique name is required");
/// errors.add("name", "Name must be less than 100 characters");
/// assert_eq!(errors.get("name"), Some("Technique name is required"));
/// assert_eq!(errors.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// Creates an empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field unless one is already recorded.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the message recorded for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterates `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts into a `Result`, failing if any field was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Request shapes that can be checked before they reach the engines.
pub trait Validate {
    /// Checks the value against the configured limits.
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors>;
}

fn check_required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    max: usize,
    required_message: &str,
    label: &str,
) {
    let length = value.trim().chars().count();
    if length == 0 {
        errors.add(field, required_message);
    } else if length > max {
        errors.add(field, too_long(label, max));
    }
}

fn check_optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
    label: &str,
) {
    if let Some(value) = value {
        if value.trim().chars().count() > max {
            errors.add(field, too_long(label, max));
        }
    }
}

fn too_long(label: &str, max: usize) -> String {
    format!("{} must be less than {} characters", label, max)
}

pub(crate) fn check_amount(
    errors: &mut ValidationErrors,
    field: &str,
    value: Decimal,
    max: Decimal,
    positive_message: &str,
    max_message: &str,
) {
    if value <= Decimal::ZERO {
        errors.add(field, positive_message);
    } else if value > max {
        errors.add(field, max_message);
    }
}

fn check_working_days(errors: &mut ValidationErrors, value: u32, max: u32) {
    if value < 1 {
        errors.add("planned_working_days", "At least 1 working day is required");
    } else if value > max {
        errors.add("planned_working_days", format!("Cannot exceed {} days", max));
    }
}

/// Checks an optional photo URL. An empty string counts as no photo.
fn check_photo(errors: &mut ValidationErrors, value: Option<&str>, max: usize) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return;
    };
    if value.chars().count() > max {
        errors.add("photo", "URL is too long");
        return;
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.add("photo", "Please enter a valid URL"),
    }
}

impl Validate for NewTechnique {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required_text(
            &mut errors,
            "name",
            &self.name,
            limits.name_max_len,
            "Technique name is required",
            "Name",
        );
        check_amount(
            &mut errors,
            "monthly_rent",
            self.monthly_rent,
            limits.max_monthly_rent,
            "Monthly rent must be a positive number",
            "Monthly rent exceeds maximum allowed value",
        );
        check_working_days(&mut errors, self.planned_working_days, limits.max_working_days);
        check_optional_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            limits.technique_description_max_len,
            "Description",
        );
        if let Some(end) = self.end_date {
            if end < self.start_date {
                errors.add("end_date", "End date cannot be before start date");
            }
        }
        errors.into_result()
    }
}

impl Validate for TechniqueUpdate {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_required_text(
                &mut errors,
                "name",
                name,
                limits.name_max_len,
                "Technique name is required",
                "Name",
            );
        }
        if let Some(rent) = self.monthly_rent {
            check_amount(
                &mut errors,
                "monthly_rent",
                rent,
                limits.max_monthly_rent,
                "Monthly rent must be a positive number",
                "Monthly rent exceeds maximum allowed value",
            );
        }
        if let Some(days) = self.planned_working_days {
            check_working_days(&mut errors, days, limits.max_working_days);
        }
        check_optional_text(
            &mut errors,
            "description",
            self.description.as_ref().and_then(|d| d.as_deref()),
            limits.technique_description_max_len,
            "Description",
        );
        if let (Some(start), Some(Some(end))) = (self.start_date, self.end_date) {
            if end < start {
                errors.add("end_date", "End date cannot be before start date");
            }
        }
        errors.into_result()
    }
}

impl Validate for NewWorker {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required_text(
            &mut errors,
            "full_name",
            &self.full_name,
            limits.name_max_len,
            "Full name is required",
            "Full name",
        );
        check_required_text(
            &mut errors,
            "position",
            &self.position,
            limits.name_max_len,
            "Position is required",
            "Position",
        );
        if let Some(salary) = self.monthly_salary {
            check_amount(
                &mut errors,
                "monthly_salary",
                salary,
                limits.max_salary,
                "Salary must be a positive number",
                "Salary exceeds maximum allowed value",
            );
        }
        check_optional_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            limits.worker_description_max_len,
            "Description",
        );
        check_photo(&mut errors, self.photo.as_deref(), limits.photo_url_max_len);
        errors.into_result()
    }
}

impl Validate for WorkerUpdate {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.full_name {
            check_required_text(
                &mut errors,
                "full_name",
                name,
                limits.name_max_len,
                "Full name is required",
                "Full name",
            );
        }
        if let Some(position) = &self.position {
            check_required_text(
                &mut errors,
                "position",
                position,
                limits.name_max_len,
                "Position is required",
                "Position",
            );
        }
        if let Some(Some(salary)) = self.monthly_salary {
            check_amount(
                &mut errors,
                "monthly_salary",
                salary,
                limits.max_salary,
                "Salary must be a positive number",
                "Salary exceeds maximum allowed value",
            );
        }
        check_optional_text(
            &mut errors,
            "description",
            self.description.as_ref().and_then(|d| d.as_deref()),
            limits.worker_description_max_len,
            "Description",
        );
        check_photo(
            &mut errors,
            self.photo.as_ref().and_then(|p| p.as_deref()),
            limits.photo_url_max_len,
        );
        errors.into_result()
    }
}

impl Validate for NewWorkerNote {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_optional_text(
            &mut errors,
            "title",
            self.title.as_deref(),
            limits.note_title_max_len,
            "Title",
        );
        check_required_text(
            &mut errors,
            "content",
            &self.content,
            limits.note_content_max_len,
            "Note content is required",
            "Note content",
        );
        errors.into_result()
    }
}

impl Validate for WorkerNoteUpdate {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_optional_text(
            &mut errors,
            "title",
            self.title.as_ref().and_then(|t| t.as_deref()),
            limits.note_title_max_len,
            "Title",
        );
        if let Some(content) = &self.content {
            check_required_text(
                &mut errors,
                "content",
                content,
                limits.note_content_max_len,
                "Note content is required",
                "Note content",
            );
        }
        errors.into_result()
    }
}

impl Validate for NewPayment {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.worker_id.is_empty() {
            errors.add("worker_id", "Worker ID is required");
        }
        check_amount(
            &mut errors,
            "amount",
            self.amount,
            limits.max_payment_amount,
            "Amount must be a positive number",
            "Amount exceeds maximum allowed value",
        );
        check_optional_text(
            &mut errors,
            "note",
            self.note.as_deref(),
            limits.payment_note_max_len,
            "Note",
        );
        errors.into_result()
    }
}

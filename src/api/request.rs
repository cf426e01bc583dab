//! Request types for the rental ledger API.
//!
//! Every endpoint receives the snapshots it computes over, plus an optional
//! `today` that defaults to the server clock.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ValidationLimits;
use crate::error::{EngineError, EngineResult};
use crate::models::{Payment, RentalStatus, Technique, Worker, parse_day};
use crate::validation::{Validate, ValidationErrors, check_amount};

/// A technique as supplied by a client.
///
/// Day-offs may be written as `YYYY-MM-DD` or as RFC 3339 timestamps; both
/// are reduced to their calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueSnapshot {
    /// Unique identifier for the technique.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// The fixed monthly rent.
    pub monthly_rent: Decimal,
    /// Planned working days per month.
    pub planned_working_days: u32,
    /// First billable day.
    pub start_date: NaiveDate,
    /// Last billable day; absent while the rental is ongoing.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Days excluded from billing.
    #[serde(default)]
    pub day_offs: Vec<String>,
    /// When the technique was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Store version of the snapshot.
    #[serde(default)]
    pub version: u64,
}

impl TechniqueSnapshot {
    /// Converts into a [`Technique`], canonicalizing day-offs.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDay`] for an unreadable day-off and
    /// [`EngineError::InvalidDateRange`] if the end precedes the start.
    pub fn into_technique(self) -> EngineResult<Technique> {
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(EngineError::InvalidDateRange {
                    start: self.start_date,
                    end,
                });
            }
        }
        let day_offs = self
            .day_offs
            .iter()
            .map(|d| parse_day(d))
            .collect::<EngineResult<_>>()?;

        Ok(Technique {
            id: self.id,
            name: self.name,
            description: self.description,
            monthly_rent: self.monthly_rent,
            planned_working_days: self.planned_working_days,
            start_date: self.start_date,
            status: RentalStatus::from_end_date(self.end_date),
            day_offs,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            version: self.version,
        })
    }
}

/// Request body for `POST /rentals/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalSummaryRequest {
    /// The rental to summarize.
    pub technique: TechniqueSnapshot,
    /// The day treated as today.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /rentals/calendar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarRequest {
    /// The rental to lay out.
    pub technique: TechniqueSnapshot,
    /// Any day of the month to show.
    pub month: NaiveDate,
    /// The day treated as today.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /rentals/portfolio`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRequest {
    /// The rentals to summarize.
    pub techniques: Vec<TechniqueSnapshot>,
    /// The day treated as today.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /payments/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusRequest {
    /// Workers to classify.
    pub workers: Vec<Worker>,
    /// All known payments.
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Any day of the month to classify; defaults to the current month.
    #[serde(default)]
    pub month: Option<NaiveDate>,
}

/// Request body for `POST /payments/recent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentPaymentsRequest {
    /// Workers the payments may belong to.
    pub workers: Vec<Worker>,
    /// All known payments.
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Maximum number of entries; defaults to the configured size.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Checks the figures of a snapshot that feed the accrual arithmetic.
///
/// Zero planned working days is accepted; the daily rate is then zero. A
/// reversed window is left to [`TechniqueSnapshot::into_technique`].
fn check_snapshot(
    errors: &mut ValidationErrors,
    prefix: &str,
    snapshot: &TechniqueSnapshot,
    limits: &ValidationLimits,
) {
    check_amount(
        errors,
        &format!("{}.monthly_rent", prefix),
        snapshot.monthly_rent,
        limits.max_monthly_rent,
        "Monthly rent must be a positive number",
        "Monthly rent exceeds maximum allowed value",
    );
    if snapshot.planned_working_days > limits.max_working_days {
        errors.add(
            format!("{}.planned_working_days", prefix),
            format!("Cannot exceed {} days", limits.max_working_days),
        );
    }
}

fn check_payments(errors: &mut ValidationErrors, payments: &[Payment], limits: &ValidationLimits) {
    for (index, payment) in payments.iter().enumerate() {
        check_amount(
            errors,
            &format!("payments[{}].amount", index),
            payment.amount,
            limits.max_payment_amount,
            "Amount must be a positive number",
            "Amount exceeds maximum allowed value",
        );
    }
}

impl Validate for RentalSummaryRequest {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_snapshot(&mut errors, "technique", &self.technique, limits);
        errors.into_result()
    }
}

impl Validate for CalendarRequest {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_snapshot(&mut errors, "technique", &self.technique, limits);
        errors.into_result()
    }
}

impl Validate for PortfolioRequest {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (index, snapshot) in self.techniques.iter().enumerate() {
            check_snapshot(&mut errors, &format!("techniques[{}]", index), snapshot, limits);
        }
        errors.into_result()
    }
}

impl Validate for PaymentStatusRequest {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_payments(&mut errors, &self.payments, limits);
        errors.into_result()
    }
}

impl Validate for RecentPaymentsRequest {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_payments(&mut errors, &self.payments, limits);
        errors.into_result()
    }
}

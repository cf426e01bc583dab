//! Calculation result models for the rental ledger.
//!
//! This module contains the derived figures produced by the accrual and
//! payment engines: the per-rental [`RentalSummary`], the audited
//! [`AccrualResult`], the month calendar view, and the worker payment
//! classification.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Payment, RentalStatus};

/// Every derived figure for one rental as of a given day.
///
/// Amounts are kept at full precision; use [`RentalSummary::rounded`] for
/// presentation.
///
/// # Example
///
/// ```
/// use rental_ledger::models::{RentalStatus, RentalSummary};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let summary = RentalSummary {
///     technique_id: "tech_001".to_string(),
///     status: RentalStatus::Active,
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     effective_end: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
///     daily_rate: Decimal::from(15000) / Decimal::from(26),
///     total_elapsed_days: 10,
///     excluded_day_offs: 0,
///     net_working_days: 10,
///     total_accrued_rent: Decimal::from(15000) / Decimal::from(26) * Decimal::from(10),
/// };
/// let rounded = summary.rounded();
/// assert_eq!(rounded.daily_rate, Decimal::from_str("576.92").unwrap());
/// assert_eq!(rounded.total_accrued_rent, Decimal::from_str("5769.23").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalSummary {
    /// The technique the figures belong to.
    pub technique_id: String,
    /// The rental status at calculation time.
    #[serde(flatten)]
    pub status: RentalStatus,
    /// First day of the rental window.
    pub start_date: NaiveDate,
    /// Last day of the rental window (end date, or "today" while ongoing).
    pub effective_end: NaiveDate,
    /// Monthly rent divided by planned working days.
    pub daily_rate: Decimal,
    /// Inclusive number of days in the window; zero if it has not started.
    pub total_elapsed_days: i64,
    /// Day-offs falling inside the window.
    pub excluded_day_offs: i64,
    /// Billable days.
    pub net_working_days: i64,
    /// Billable days times the daily rate.
    pub total_accrued_rent: Decimal,
}

impl RentalSummary {
    /// Returns a copy with monetary amounts rounded for display.
    pub fn rounded(&self) -> Self {
        Self {
            daily_rate: crate::calculation::round_money(self.daily_rate),
            total_accrued_rent: crate::calculation::round_money(self.total_accrued_rent),
            ..self.clone()
        }
    }
}

/// Totals over a set of rentals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Number of ongoing rentals.
    pub active_count: usize,
    /// Number of ended rentals.
    pub ended_count: usize,
    /// Accrued rent summed over ongoing rentals.
    pub total_active_rent: Decimal,
    /// Per-rental figures, in input order.
    pub rentals: Vec<RentalSummary>,
}

/// One cell of a month calendar for a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// The calendar day.
    pub date: NaiveDate,
    /// Whether the day lies within the rental window.
    pub in_period: bool,
    /// Whether the day is marked as a day-off.
    pub is_day_off: bool,
    /// Whether the day is "today".
    pub is_today: bool,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag data that is accepted but may surprise the reader, such as
/// day-offs that currently fall outside the rental window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The audited result of an accrual calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The day used as "today".
    pub as_of: NaiveDate,
    /// The derived figures, at full precision.
    pub summary: RentalSummary,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

/// A worker's payment fulfillment for a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Paid at least the monthly salary.
    Full,
    /// Paid something, but less than the monthly salary.
    Partial,
    /// Nothing paid, or no salary target set.
    None,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Full => write!(f, "full"),
            PaymentStatus::Partial => write!(f, "partial"),
            PaymentStatus::None => write!(f, "none"),
        }
    }
}

/// A worker's payments and status for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerMonthSummary {
    /// The worker.
    pub worker_id: String,
    /// First day of the month summarized.
    pub month: NaiveDate,
    /// The salary target, if any.
    pub monthly_salary: Option<Decimal>,
    /// Sum of the month's payments.
    pub total_paid: Decimal,
    /// Fulfillment classification.
    pub status: PaymentStatus,
    /// The month's payments, in input order.
    pub payments: Vec<Payment>,
}

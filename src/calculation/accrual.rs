//! Rental accrual.
//!
//! This module derives the billing figures of a rental from its snapshot: the
//! daily rate prorated from the monthly rent, the inclusive length of the
//! rental window, the day-offs that currently fall inside it, and the accrued
//! rent. Every function is pure; "today" is supplied by the caller.
//!
//! Amounts are not rounded here. Division results keep full `Decimal`
//! precision so that multiplying by a day count does not compound rounding
//! error; use [`round_money`] at presentation time.

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::models::{
    AccrualResult, AuditStep, AuditTrace, AuditWarning, PortfolioSummary, RentalSummary,
    Technique,
};

use super::date_range::days_between_inclusive;

/// Number of fractional digits shown for monetary amounts.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount for display (two places, halves away from zero).
///
/// # Example
///
/// ```
/// use rental_ledger::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("576.923076").unwrap()).to_string(), "576.92");
/// assert_eq!(round_money(Decimal::from_str("0.125").unwrap()).to_string(), "0.13");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the monthly rent divided by the planned working days.
///
/// A technique with zero planned working days has a daily rate of zero.
///
/// # Example
///
/// ```
/// use rental_ledger::calculation::{daily_rate, round_money};
/// # use rental_ledger::models::{RentalStatus, Technique};
/// # use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// # let technique = Technique {
/// #     id: "tech_001".to_string(),
/// #     name: "Excavator".to_string(),
/// #     description: None,
/// #     monthly_rent: Decimal::from(15000),
/// #     planned_working_days: 26,
/// #     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// #     status: RentalStatus::Active,
/// #     day_offs: Default::default(),
/// #     created_at: Utc::now(),
/// #     version: 0,
/// # };
///
/// assert_eq!(round_money(daily_rate(&technique)), Decimal::new(57692, 2));
/// ```
pub fn daily_rate(technique: &Technique) -> Decimal {
    if technique.planned_working_days == 0 {
        return Decimal::ZERO;
    }
    technique.monthly_rent / Decimal::from(technique.planned_working_days)
}

/// Returns the last day of the rental window: the end date, or `today` while
/// the rental is ongoing.
pub fn effective_end(technique: &Technique, today: NaiveDate) -> NaiveDate {
    technique.end_date().unwrap_or(today)
}

/// Returns the inclusive number of days in the rental window.
///
/// A rental that starts after its effective end (for example, one scheduled to
/// start in the future) has zero elapsed days.
pub fn total_elapsed_days(technique: &Technique, today: NaiveDate) -> i64 {
    match days_between_inclusive(technique.start_date, effective_end(technique, today)) {
        Ok(days) => days,
        // Not started yet.
        Err(_) => 0,
    }
}

/// Counts the day-offs inside `[start_date, effective_end]`.
///
/// Day-offs outside the window are ignored but stay in the set.
pub fn excluded_day_offs(technique: &Technique, today: NaiveDate) -> i64 {
    let end = effective_end(technique, today);
    if technique.start_date > end {
        return 0;
    }
    technique.day_offs.range(technique.start_date..=end).count() as i64
}

/// Returns the billable days: elapsed days minus excluded day-offs, never
/// below zero.
pub fn net_working_days(technique: &Technique, today: NaiveDate) -> i64 {
    (total_elapsed_days(technique, today) - excluded_day_offs(technique, today)).max(0)
}

/// Returns the rent accrued so far: billable days times the daily rate.
pub fn total_accrued_rent(technique: &Technique, today: NaiveDate) -> Decimal {
    Decimal::from(net_working_days(technique, today)) * daily_rate(technique)
}

/// Computes every derived figure for a rental in one pass.
pub fn summarize(technique: &Technique, today: NaiveDate) -> RentalSummary {
    let rate = daily_rate(technique);
    let elapsed = total_elapsed_days(technique, today);
    let excluded = excluded_day_offs(technique, today);
    let net = (elapsed - excluded).max(0);

    RentalSummary {
        technique_id: technique.id.clone(),
        status: technique.status,
        start_date: technique.start_date,
        effective_end: effective_end(technique, today),
        daily_rate: rate,
        total_elapsed_days: elapsed,
        excluded_day_offs: excluded,
        net_working_days: net,
        total_accrued_rent: Decimal::from(net) * rate,
    }
}

/// Computes a rental's figures together with an audit trace of each step.
///
/// The trace records the inputs and outputs of the daily-rate, window,
/// day-off and accrual steps, and warns about day-offs that are currently
/// inert and about rentals that have not started.
pub fn calculate_rental_accrual(technique: &Technique, today: NaiveDate) -> AccrualResult {
    let started_at = Instant::now();
    let summary = summarize(technique, today);
    let mut warnings = Vec::new();

    let steps = vec![
        AuditStep {
            step_number: 1,
            rule_id: "daily_rate".to_string(),
            rule_name: "Daily Rate Proration".to_string(),
            input: serde_json::json!({
                "monthly_rent": technique.monthly_rent.normalize().to_string(),
                "planned_working_days": technique.planned_working_days
            }),
            output: serde_json::json!({
                "daily_rate": round_money(summary.daily_rate).to_string()
            }),
            reasoning: if technique.planned_working_days == 0 {
                "No planned working days, daily rate is zero".to_string()
            } else {
                format!(
                    "{} monthly rent over {} planned working days",
                    technique.monthly_rent.normalize(),
                    technique.planned_working_days
                )
            },
        },
        AuditStep {
            step_number: 2,
            rule_id: "rental_window".to_string(),
            rule_name: "Rental Window".to_string(),
            input: serde_json::json!({
                "start_date": technique.start_date.to_string(),
                "end_date": technique.end_date().map(|d| d.to_string()),
                "today": today.to_string()
            }),
            output: serde_json::json!({
                "effective_end": summary.effective_end.to_string(),
                "total_elapsed_days": summary.total_elapsed_days
            }),
            reasoning: match technique.end_date() {
                Some(end) => format!("Rental ended on {}", end),
                None => format!("Rental is ongoing, window ends today ({})", today),
            },
        },
        AuditStep {
            step_number: 3,
            rule_id: "day_off_exclusion".to_string(),
            rule_name: "Day-Off Exclusion".to_string(),
            input: serde_json::json!({
                "day_offs": technique.day_offs.len()
            }),
            output: serde_json::json!({
                "excluded_day_offs": summary.excluded_day_offs,
                "net_working_days": summary.net_working_days
            }),
            reasoning: format!(
                "{} of {} day-offs fall within {} to {}",
                summary.excluded_day_offs,
                technique.day_offs.len(),
                technique.start_date,
                summary.effective_end
            ),
        },
        AuditStep {
            step_number: 4,
            rule_id: "rent_accrual".to_string(),
            rule_name: "Rent Accrual".to_string(),
            input: serde_json::json!({
                "net_working_days": summary.net_working_days,
                "daily_rate": round_money(summary.daily_rate).to_string()
            }),
            output: serde_json::json!({
                "total_accrued_rent": round_money(summary.total_accrued_rent).to_string()
            }),
            reasoning: format!(
                "{} working days at the unrounded daily rate",
                summary.net_working_days
            ),
        },
    ];

    let inert = technique.day_offs.len() as i64 - summary.excluded_day_offs;
    if inert > 0 {
        warnings.push(AuditWarning {
            code: "DAY_OFFS_OUTSIDE_PERIOD".to_string(),
            message: format!("{} day-offs fall outside the rental window and are not counted", inert),
            severity: "low".to_string(),
        });
    }
    if summary.total_elapsed_days == 0 {
        warnings.push(AuditWarning {
            code: "RENTAL_NOT_STARTED".to_string(),
            message: format!("Rental starts on {}, after {}", technique.start_date, summary.effective_end),
            severity: "low".to_string(),
        });
    }

    AccrualResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        as_of: today,
        summary,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: started_at.elapsed().as_micros() as u64,
        },
    }
}

/// Returns the ongoing rentals.
pub fn active_techniques(techniques: &[Technique]) -> Vec<&Technique> {
    techniques.iter().filter(|t| t.is_active()).collect()
}

/// Returns the ended rentals.
pub fn ended_techniques(techniques: &[Technique]) -> Vec<&Technique> {
    techniques.iter().filter(|t| !t.is_active()).collect()
}

/// Sums the accrued rent of the ongoing rentals.
pub fn total_active_rent(techniques: &[Technique], today: NaiveDate) -> Decimal {
    techniques
        .iter()
        .filter(|t| t.is_active())
        .map(|t| total_accrued_rent(t, today))
        .sum()
}

/// Summarizes a set of rentals.
pub fn summarize_portfolio(techniques: &[Technique], today: NaiveDate) -> PortfolioSummary {
    let rentals: Vec<RentalSummary> = techniques.iter().map(|t| summarize(t, today)).collect();
    let active_count = rentals.iter().filter(|r| r.status.is_active()).count();

    PortfolioSummary {
        active_count,
        ended_count: rentals.len() - active_count,
        total_active_rent: rentals
            .iter()
            .filter(|r| r.status.is_active())
            .map(|r| r.total_accrued_rent)
            .sum(),
        rentals,
    }
}

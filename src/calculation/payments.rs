//! Worker payment aggregation.
//!
//! Payments arrive as an unordered list; everything here groups them by
//! worker and calendar month and classifies a worker's month against their
//! salary target.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{Payment, PaymentStatus, PaymentWithWorker, Worker, WorkerMonthSummary};

use super::date_range::month_start;

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Returns every payment made to a worker, in input order.
pub fn worker_payments<'a>(payments: &'a [Payment], worker_id: &str) -> Vec<&'a Payment> {
    payments.iter().filter(|p| p.worker_id == worker_id).collect()
}

/// Returns a worker's payments dated in the calendar month containing `month`.
///
/// Only the month and year are compared; the day of `month` is ignored.
pub fn monthly_payments<'a>(
    payments: &'a [Payment],
    worker_id: &str,
    month: NaiveDate,
) -> Vec<&'a Payment> {
    payments
        .iter()
        .filter(|p| p.worker_id == worker_id && same_month(p.date, month))
        .collect()
}

/// Sums a worker's payments for the month containing `month`.
pub fn total_paid(payments: &[Payment], worker_id: &str, month: NaiveDate) -> Decimal {
    monthly_payments(payments, worker_id, month)
        .into_iter()
        .map(|p| p.amount)
        .sum()
}

/// Classifies a month's total against a salary target.
///
/// # Example
///
/// ```
/// use rental_ledger::calculation::payment_status;
/// use rental_ledger::models::PaymentStatus;
/// use rust_decimal::Decimal;
///
/// let salary = Some(Decimal::from(5000));
/// assert_eq!(payment_status(Decimal::from(3500), salary), PaymentStatus::Partial);
/// assert_eq!(payment_status(Decimal::from(5500), salary), PaymentStatus::Full);
/// assert_eq!(payment_status(Decimal::from(3500), None), PaymentStatus::None);
/// ```
pub fn payment_status(total_paid: Decimal, monthly_salary: Option<Decimal>) -> PaymentStatus {
    let Some(salary) = monthly_salary.filter(|s| *s > Decimal::ZERO) else {
        return PaymentStatus::None;
    };
    if total_paid >= salary {
        PaymentStatus::Full
    } else if total_paid > Decimal::ZERO {
        PaymentStatus::Partial
    } else {
        PaymentStatus::None
    }
}

/// Summarizes one worker's month.
pub fn worker_month_summary(
    worker: &Worker,
    payments: &[Payment],
    month: NaiveDate,
) -> WorkerMonthSummary {
    let month_payments: Vec<Payment> = monthly_payments(payments, &worker.id, month)
        .into_iter()
        .cloned()
        .collect();
    let total: Decimal = month_payments.iter().map(|p| p.amount).sum();

    WorkerMonthSummary {
        worker_id: worker.id.clone(),
        month: month_start(month),
        monthly_salary: worker.monthly_salary,
        total_paid: total,
        status: payment_status(total, worker.monthly_salary),
        payments: month_payments,
    }
}

/// Counts the workers fully paid for the month containing `month`.
pub fn fully_paid_count(workers: &[Worker], payments: &[Payment], month: NaiveDate) -> usize {
    workers
        .iter()
        .filter(|w| {
            payment_status(total_paid(payments, &w.id, month), w.monthly_salary)
                == PaymentStatus::Full
        })
        .count()
}

/// Sums every payment, to any worker, in the month containing `month`.
pub fn total_payments_for_month(payments: &[Payment], month: NaiveDate) -> Decimal {
    payments
        .iter()
        .filter(|p| same_month(p.date, month))
        .map(|p| p.amount)
        .sum()
}

/// Returns the latest payments paired with their workers, newest first.
///
/// Payments whose worker cannot be found are dropped after truncation, so the
/// result may be shorter than `limit`. Payments on the same day keep their
/// input order.
pub fn recent_payments(
    payments: &[Payment],
    workers: &[Worker],
    limit: usize,
) -> Vec<PaymentWithWorker> {
    let by_id: HashMap<&str, &Worker> = workers.iter().map(|w| (w.id.as_str(), w)).collect();

    let mut sorted: Vec<&Payment> = payments.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .take(limit)
        .filter_map(|payment| {
            by_id.get(payment.worker_id.as_str()).map(|worker| PaymentWithWorker {
                payment: payment.clone(),
                worker: (*worker).clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(id: &str, worker_id: &str, amount: i64, day: NaiveDate) -> Payment {
        Payment {
            id: id.to_string(),
            worker_id: worker_id.to_string(),
            amount: Decimal::from(amount),
            date: day,
            note: None,
        }
    }

    fn worker(id: &str, salary: Option<i64>) -> Worker {
        Worker {
            id: id.to_string(),
            full_name: format!("Worker {}", id),
            position: "Operator".to_string(),
            monthly_salary: salary.map(Decimal::from),
            description: None,
            photo: None,
            created_at: Utc::now(),
            notes: vec![],
            version: 0,
        }
    }

    // ==========================================================================
    // Scenario D: partial, then full, then overpaid
    // ==========================================================================
    #[test]
    fn test_status_progression_for_salary_5000() {
        let w = worker("wrk_001", Some(5000));
        let month = date(2024, 1, 1);
        let mut payments = vec![
            payment("p1", "wrk_001", 2000, date(2024, 1, 3)),
            payment("p2", "wrk_001", 1500, date(2024, 1, 12)),
        ];

        let summary = worker_month_summary(&w, &payments, month);
        assert_eq!(summary.total_paid, Decimal::from(3500));
        assert_eq!(summary.status, PaymentStatus::Partial);

        payments.push(payment("p3", "wrk_001", 1500, date(2024, 1, 20)));
        assert_eq!(worker_month_summary(&w, &payments, month).status, PaymentStatus::Full);

        payments.push(payment("p4", "wrk_001", 500, date(2024, 1, 25)));
        let overpaid = worker_month_summary(&w, &payments, month);
        assert_eq!(overpaid.total_paid, Decimal::from(5500));
        assert_eq!(overpaid.status, PaymentStatus::Full);
    }

    // ==========================================================================
    // Scenario E: month boundary
    // ==========================================================================
    #[test]
    fn test_month_boundary_selects_only_matching_month() {
        let payments = vec![
            payment("p1", "wrk_001", 100, date(2024, 1, 31)),
            payment("p2", "wrk_001", 200, date(2024, 2, 1)),
        ];

        let february = monthly_payments(&payments, "wrk_001", date(2024, 2, 15));
        assert_eq!(february.len(), 1);
        assert_eq!(february[0].id, "p2");
    }

    #[test]
    fn test_same_month_different_year_is_excluded() {
        let payments = vec![payment("p1", "wrk_001", 100, date(2023, 3, 10))];
        assert!(monthly_payments(&payments, "wrk_001", date(2024, 3, 10)).is_empty());
    }

    #[test]
    fn test_total_paid_empty_is_zero() {
        assert_eq!(total_paid(&[], "wrk_001", date(2024, 1, 1)), Decimal::ZERO);
    }

    #[test]
    fn test_status_none_without_salary_or_payments() {
        assert_eq!(payment_status(Decimal::from(100), None), PaymentStatus::None);
        assert_eq!(payment_status(Decimal::from(100), Some(Decimal::ZERO)), PaymentStatus::None);
        assert_eq!(payment_status(Decimal::ZERO, Some(Decimal::from(5000))), PaymentStatus::None);
    }

    #[test]
    fn test_worker_payments_filters_by_worker() {
        let payments = vec![
            payment("p1", "wrk_001", 100, date(2024, 1, 1)),
            payment("p2", "wrk_002", 100, date(2024, 1, 1)),
            payment("p3", "wrk_001", 100, date(2024, 5, 1)),
        ];
        let ids: Vec<&str> = worker_payments(&payments, "wrk_001")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_fully_paid_count_and_month_total() {
        let workers = vec![
            worker("wrk_001", Some(1000)),
            worker("wrk_002", Some(1000)),
            worker("wrk_003", None),
        ];
        let payments = vec![
            payment("p1", "wrk_001", 1000, date(2024, 1, 5)),
            payment("p2", "wrk_002", 400, date(2024, 1, 6)),
            payment("p3", "wrk_003", 700, date(2024, 1, 7)),
            payment("p4", "wrk_002", 900, date(2024, 2, 1)),
        ];
        let month = date(2024, 1, 1);

        assert_eq!(fully_paid_count(&workers, &payments, month), 1);
        assert_eq!(total_payments_for_month(&payments, month), Decimal::from(2100));
    }

    #[test]
    fn test_recent_payments_sorted_truncated_and_paired() {
        let workers = vec![worker("wrk_001", Some(1000))];
        let payments = vec![
            payment("p1", "wrk_001", 100, date(2024, 1, 1)),
            payment("p2", "wrk_001", 100, date(2024, 3, 1)),
            payment("p3", "wrk_001", 100, date(2024, 2, 1)),
        ];

        let recent = recent_payments(&payments, &workers, 2);
        let ids: Vec<&str> = recent.iter().map(|r| r.payment.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3"]);
        assert_eq!(recent[0].worker.id, "wrk_001");
    }

    #[test]
    fn test_recent_payments_drops_unknown_workers() {
        let workers = vec![worker("wrk_001", None)];
        let payments = vec![
            payment("p1", "wrk_001", 100, date(2024, 1, 1)),
            payment("p2", "ghost", 100, date(2024, 3, 1)),
        ];

        let recent = recent_payments(&payments, &workers, 5);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].payment.id, "p1");
    }

    #[test]
    fn test_summary_month_is_first_of_month() {
        let summary = worker_month_summary(&worker("wrk_001", None), &[], date(2024, 2, 17));
        assert_eq!(summary.month, date(2024, 2, 1));
        assert_eq!(summary.status, PaymentStatus::None);
    }

    proptest! {
        #[test]
        fn prop_status_matches_thresholds(paid in 0i64..20_000, salary in 1i64..20_000) {
            let status = payment_status(Decimal::from(paid), Some(Decimal::from(salary)));
            let expected = if paid >= salary {
                PaymentStatus::Full
            } else if paid > 0 {
                PaymentStatus::Partial
            } else {
                PaymentStatus::None
            };
            prop_assert_eq!(status, expected);
        }

        #[test]
        fn prop_monthly_totals_partition_all_payments(
            days in proptest::collection::vec(0i64..730, 0..50),
        ) {
            let base = date(2024, 1, 1);
            let payments: Vec<Payment> = days
                .iter()
                .enumerate()
                .map(|(i, d)| payment(&format!("p{}", i), "wrk_001", 10, base + chrono::Duration::days(*d)))
                .collect();

            let mut total = Decimal::ZERO;
            let mut month = base;
            while month < base + chrono::Duration::days(730) {
                total += total_paid(&payments, "wrk_001", month);
                month = month.checked_add_months(chrono::Months::new(1)).unwrap();
            }
            prop_assert_eq!(total, Decimal::from(10 * payments.len() as i64));
        }
    }
}

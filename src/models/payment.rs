//! Payment model.
//!
//! Payments are independent top-level records related to a worker only by
//! `worker_id`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Worker;

/// An amount paid to a worker on a given day.
///
/// # Example
///
/// ```
/// use rental_ledger::models::Payment;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let payment = Payment {
///     id: "pay_001".to_string(),
///     worker_id: "wrk_001".to_string(),
///     amount: Decimal::new(200000, 2),
///     date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
///     note: Some("Advance".to_string()),
/// };
/// assert_eq!(payment.amount.to_string(), "2000.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for the payment.
    pub id: String,
    /// The worker the payment was made to.
    pub worker_id: String,
    /// The amount paid.
    pub amount: Decimal,
    /// The calendar day of the payment.
    pub date: NaiveDate,
    /// Optional note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Fields supplied when recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    /// The worker being paid.
    pub worker_id: String,
    /// The amount paid.
    pub amount: Decimal,
    /// The calendar day of the payment.
    pub date: NaiveDate,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

/// A payment paired with the worker that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentWithWorker {
    /// The payment.
    #[serde(flatten)]
    pub payment: Payment,
    /// The owning worker.
    pub worker: Worker,
}

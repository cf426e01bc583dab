//! Rental ledger engine.
//!
//! This crate computes the billing figures of rented equipment (daily rate,
//! billable days after day-offs, accrued rent), maintains each rental's
//! day-off calendar, and aggregates payments made to workers against their
//! monthly salary targets.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod session;
pub mod store;
pub mod validation;

//! Core data models for the rental ledger.
//!
//! This module contains the snapshots supplied by the store (techniques,
//! workers, payments), the request shapes used to mutate them, and the
//! derived results produced by the calculation engines.

mod calculation_result;
mod day;
mod payment;
mod technique;
mod worker;

pub use calculation_result::{
    AccrualResult, AuditStep, AuditTrace, AuditWarning, CalendarDay, PaymentStatus,
    PortfolioSummary, RentalSummary, WorkerMonthSummary,
};
pub use day::{DAY_FORMAT, ToCalendarDay, canonical_day, parse_day};
pub use payment::{NewPayment, Payment, PaymentWithWorker};
pub use technique::{NewTechnique, RentalStatus, Technique, TechniqueUpdate};
pub use worker::{NewWorker, NewWorkerNote, Worker, WorkerNote, WorkerNoteUpdate, WorkerUpdate};

//! Calculation logic for the rental ledger.
//!
//! This module contains the pure engines: day-granular interval math, rental
//! accrual (daily rate, elapsed and billable days, accrued rent), the day-off
//! register and month calendar, the technique lifecycle, and worker payment
//! aggregation. None of them read the clock; "today" is always an argument.

mod accrual;
mod date_range;
mod day_off;
mod lifecycle;
mod payments;

pub use accrual::{
    MONEY_DECIMAL_PLACES, active_techniques, calculate_rental_accrual, daily_rate,
    effective_end, ended_techniques, excluded_day_offs, net_working_days, round_money,
    summarize, summarize_portfolio, total_accrued_rent, total_active_rent, total_elapsed_days,
};
pub use date_range::{days_between_inclusive, days_of_month, is_within, month_end, month_start};
pub use day_off::{add_day_off, day_offs_in_period, month_calendar, remove_day_off, toggle_day_off};
pub use lifecycle::{create_technique, end_technique, update_technique};
pub(crate) use lifecycle::normalize_text;
pub use payments::{
    fully_paid_count, monthly_payments, payment_status, recent_payments, total_paid,
    total_payments_for_month, worker_month_summary, worker_payments,
};

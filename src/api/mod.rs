//! HTTP API module for the rental ledger.
//!
//! This module exposes the calculation engines as stateless REST endpoints:
//! clients post the snapshots they hold and receive the derived figures.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalendarRequest, PaymentStatusRequest, PortfolioRequest, RecentPaymentsRequest,
    RentalSummaryRequest, TechniqueSnapshot,
};
pub use response::{
    ApiError, ApiErrorResponse, CalendarResponse, PaymentStatusResponse, PortfolioResponse,
    RecentPaymentsResponse, RentalSummaryResponse,
};
pub use state::AppState;

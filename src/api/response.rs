//! Response types for the rental ledger API.
//!
//! This module defines the success bodies returned by each endpoint and the
//! error response structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::round_money;
use crate::error::EngineError;
use crate::models::{
    AccrualResult, AuditTrace, CalendarDay, PaymentWithWorker, PortfolioSummary, RentalSummary,
    WorkerMonthSummary,
};
use crate::validation::ValidationErrors;

/// Response body for `POST /rentals/summary`.
///
/// Amounts in `summary` are rounded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalSummaryResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The day used as today.
    pub as_of: NaiveDate,
    /// The derived figures.
    pub summary: RentalSummary,
    /// Day-offs that count against billing, in order.
    pub day_offs_in_period: Vec<NaiveDate>,
    /// The steps taken.
    pub audit_trace: AuditTrace,
}

impl RentalSummaryResponse {
    /// Builds the response from an audited result.
    pub fn new(result: AccrualResult, day_offs_in_period: Vec<NaiveDate>) -> Self {
        Self {
            calculation_id: result.calculation_id,
            timestamp: result.timestamp,
            engine_version: result.engine_version,
            as_of: result.as_of,
            summary: result.summary.rounded(),
            day_offs_in_period,
            audit_trace: result.audit_trace,
        }
    }
}

/// Response body for `POST /rentals/calendar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarResponse {
    /// The technique laid out.
    pub technique_id: String,
    /// First day of the month shown.
    pub month: NaiveDate,
    /// One entry per day of the month.
    pub days: Vec<CalendarDay>,
}

/// Response body for `POST /rentals/portfolio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioResponse {
    /// The day used as today.
    pub as_of: NaiveDate,
    /// Number of ongoing rentals.
    pub active_count: usize,
    /// Number of ended rentals.
    pub ended_count: usize,
    /// Accrued rent over ongoing rentals, rounded.
    pub total_active_rent: Decimal,
    /// Per-rental figures, rounded.
    pub rentals: Vec<RentalSummary>,
}

impl PortfolioResponse {
    /// Builds the response, rounding every amount.
    pub fn new(as_of: NaiveDate, portfolio: PortfolioSummary) -> Self {
        Self {
            as_of,
            active_count: portfolio.active_count,
            ended_count: portfolio.ended_count,
            total_active_rent: round_money(portfolio.total_active_rent),
            rentals: portfolio.rentals.iter().map(RentalSummary::rounded).collect(),
        }
    }
}

/// Response body for `POST /payments/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    /// First day of the month classified.
    pub month: NaiveDate,
    /// Workers paid at least their salary.
    pub fully_paid_count: usize,
    /// Everything paid to anyone in the month.
    pub total_payments_for_month: Decimal,
    /// Per-worker summaries, in input order.
    pub workers: Vec<WorkerMonthSummary>,
}

/// Response body for `POST /payments/recent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPaymentsResponse {
    /// The latest payments, newest first.
    pub payments: Vec<PaymentWithWorker>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Per-field messages for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            fields: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response listing the failing fields.
    pub fn validation_error(errors: ValidationErrors) -> Self {
        Self {
            fields: Some(errors.clone()),
            ..Self::new("VALIDATION_ERROR", format!("Validation failed: {}", errors))
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidDateRange { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_DATE_RANGE",
                    message,
                    "The rental window must not end before it starts",
                ),
            },
            EngineError::InvalidRange { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_RANGE", message),
            },
            EngineError::InvalidDay { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_DAY",
                    message,
                    "Days must be written as YYYY-MM-DD or an RFC 3339 timestamp",
                ),
            },
            EngineError::Validation(errors) => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(errors),
            },
            EngineError::NotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", message),
            },
            EngineError::VersionConflict { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "VERSION_CONFLICT",
                    message,
                    "Refresh the snapshot and retry",
                ),
            },
            EngineError::Unauthorized { .. } => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("UNAUTHORIZED", message),
            },
            EngineError::Storage { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            },
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
        }
    }
}

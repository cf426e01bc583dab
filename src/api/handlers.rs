//! HTTP request handlers for the rental ledger API.
//!
//! Every endpoint is a pure calculation over the snapshots in the request
//! body. Nothing is read from or written to a store. Snapshots are checked
//! against the configured limits before any arithmetic runs.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_rental_accrual, day_offs_in_period, fully_paid_count, month_calendar, month_start,
    recent_payments, summarize_portfolio, total_payments_for_month, worker_month_summary,
};
use crate::error::{EngineError, EngineResult};
use crate::models::Technique;
use crate::validation::Validate;

use super::request::{
    CalendarRequest, PaymentStatusRequest, PortfolioRequest, RecentPaymentsRequest,
    RentalSummaryRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, CalendarResponse, PaymentStatusResponse, PortfolioResponse,
    RecentPaymentsResponse, RentalSummaryResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rentals/summary", post(rental_summary_handler))
        .route("/rentals/calendar", post(calendar_handler))
        .route("/rentals/portfolio", post(portfolio_handler))
        .route("/payments/status", post(payment_status_handler))
        .route("/payments/recent", post(recent_payments_handler))
        .with_state(state)
}

/// Handler for POST /rentals/summary.
///
/// Returns the audited accrual figures for one rental.
async fn rental_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<RentalSummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing rental summary request");

    let request = match read_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(errors) = request.validate(state.config().limits()) {
        return engine_error(errors.into(), correlation_id);
    }
    let technique = match request.technique.into_technique() {
        Ok(technique) => technique,
        Err(err) => return engine_error(err, correlation_id),
    };

    let start_time = Instant::now();
    let today = state.today_or(request.today);
    let result = calculate_rental_accrual(&technique, today);
    let day_offs = day_offs_in_period(&technique, today);

    info!(
        correlation_id = %correlation_id,
        technique_id = %technique.id,
        net_working_days = result.summary.net_working_days,
        total_accrued_rent = %result.summary.total_accrued_rent,
        duration_us = start_time.elapsed().as_micros(),
        "Rental summary completed successfully"
    );
    json_response(StatusCode::OK, RentalSummaryResponse::new(result, day_offs))
}

/// Handler for POST /rentals/calendar.
///
/// Lays out one month of a rental's calendar.
async fn calendar_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalendarRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calendar request");

    let request = match read_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(errors) = request.validate(state.config().limits()) {
        return engine_error(errors.into(), correlation_id);
    }
    let technique = match request.technique.into_technique() {
        Ok(technique) => technique,
        Err(err) => return engine_error(err, correlation_id),
    };

    let today = state.today_or(request.today);
    let days = month_calendar(&technique, request.month, today);

    info!(
        correlation_id = %correlation_id,
        technique_id = %technique.id,
        month = %month_start(request.month),
        "Calendar completed successfully"
    );
    json_response(
        StatusCode::OK,
        CalendarResponse {
            technique_id: technique.id,
            month: month_start(request.month),
            days,
        },
    )
}

/// Handler for POST /rentals/portfolio.
async fn portfolio_handler(
    State(state): State<AppState>,
    payload: Result<Json<PortfolioRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing portfolio request");

    let request = match read_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(errors) = request.validate(state.config().limits()) {
        return engine_error(errors.into(), correlation_id);
    }
    let techniques = match request
        .techniques
        .into_iter()
        .map(|snapshot| snapshot.into_technique())
        .collect::<EngineResult<Vec<Technique>>>()
    {
        Ok(techniques) => techniques,
        Err(err) => return engine_error(err, correlation_id),
    };

    let start_time = Instant::now();
    let today = state.today_or(request.today);
    let portfolio = summarize_portfolio(&techniques, today);

    info!(
        correlation_id = %correlation_id,
        rentals_count = techniques.len(),
        active_count = portfolio.active_count,
        total_active_rent = %portfolio.total_active_rent,
        duration_us = start_time.elapsed().as_micros(),
        "Portfolio completed successfully"
    );
    json_response(StatusCode::OK, PortfolioResponse::new(today, portfolio))
}

/// Handler for POST /payments/status.
///
/// Classifies every worker's fulfillment for one month.
async fn payment_status_handler(
    State(state): State<AppState>,
    payload: Result<Json<PaymentStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payment status request");

    let request = match read_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(errors) = request.validate(state.config().limits()) {
        return engine_error(errors.into(), correlation_id);
    }

    let start_time = Instant::now();
    let month = month_start(state.today_or(request.month));
    let workers = request
        .workers
        .iter()
        .map(|worker| worker_month_summary(worker, &request.payments, month))
        .collect();
    let response = PaymentStatusResponse {
        month,
        fully_paid_count: fully_paid_count(&request.workers, &request.payments, month),
        total_payments_for_month: total_payments_for_month(&request.payments, month),
        workers,
    };

    info!(
        correlation_id = %correlation_id,
        month = %month,
        workers_count = request.workers.len(),
        fully_paid_count = response.fully_paid_count,
        duration_us = start_time.elapsed().as_micros(),
        "Payment status completed successfully"
    );
    json_response(StatusCode::OK, response)
}

/// Handler for POST /payments/recent.
async fn recent_payments_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecentPaymentsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing recent payments request");

    let request = match read_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(errors) = request.validate(state.config().limits()) {
        return engine_error(errors.into(), correlation_id);
    }

    let limit = request
        .limit
        .unwrap_or_else(|| state.config().recent_payments_limit());
    let payments = recent_payments(&request.payments, &request.workers, limit);

    info!(
        correlation_id = %correlation_id,
        limit,
        returned = payments.len(),
        "Recent payments completed successfully"
    );
    json_response(StatusCode::OK, RecentPaymentsResponse { payments })
}

/// Unwraps a JSON body, turning a rejection into a 400 response.
fn read_payload<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries serde's message
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(json_response(StatusCode::BAD_REQUEST, error))
        }
    }
}

fn engine_error(err: EngineError, correlation_id: Uuid) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Calculation failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

//! # REST API Interface Layer
//!
//! JSON endpoints mounted under `/api`. Handlers translate DTOs from the
//! `shared` crate into domain inputs, call the record store or the derived
//! data calculator, and translate domain errors into HTTP status codes.
//!
//! Every failure answers with an [`ErrorResponse`] body carrying a short
//! machine-readable code.

pub mod advisor_apis;
pub mod budget_apis;
pub mod expense_apis;
pub mod insight_apis;
pub mod mappers;
pub mod session_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::{AdvisoryError, StoreError};
use crate::AppState;

pub fn store_error_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        StoreError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::DuplicateCategory(_) => StatusCode::CONFLICT,
        StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        StoreError::ExpenseNotFound(_) | StoreError::BudgetNotFound(_) => StatusCode::NOT_FOUND,
    }
}

pub fn advisory_error_status(error: &AdvisoryError) -> StatusCode {
    match error {
        AdvisoryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AdvisoryError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AdvisoryError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_body(status: StatusCode, code: &str, message: String) -> Response {
    let body = ErrorResponse {
        code: code.to_string(),
        message,
    };
    (status, Json(body)).into_response()
}

pub(crate) fn store_error_response(context: &str, error: StoreError) -> Response {
    let status = store_error_status(&error);
    if status.is_server_error() {
        error!("{}: {}", context, error);
    } else {
        warn!("{}: {}", context, error);
    }
    error_body(status, error.code(), error.to_string())
}

pub(crate) fn advisory_error_response(context: &str, error: AdvisoryError) -> Response {
    let status = advisory_error_status(&error);
    if status.is_server_error() {
        error!("{}: {}", context, error);
    } else {
        warn!("{}: {}", context, error);
    }
    error_body(status, error.code(), error.to_string())
}

/// Reject reads when nobody is signed in.
pub(crate) fn require_session(state: &AppState) -> Result<(), Response> {
    if state.record_store.status().user_id.is_none() {
        return Err(store_error_response(
            "Read without session",
            StoreError::NotAuthenticated,
        ));
    }
    Ok(())
}

//! # REST API for derived data
//!
//! Category list, chart series and dashboard figures. All of it is computed
//! from the session snapshot on each request.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::DerivedData;
use crate::io::rest::mappers::insight_mapper::InsightMapper;
use crate::io::rest::require_session;
use crate::AppState;
use shared::{CategoryListResponse, SpendingByCategoryResponse, SpendingOverTimeResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/spending/by-category", get(spending_by_category))
        .route("/spending/over-time", get(spending_over_time))
        .route("/dashboard/summary", get(dashboard_summary))
}

/// Default categories plus every category in use, sorted
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");
    if let Err(response) = require_session(&state) {
        return response;
    }

    let snapshot = state.record_store.snapshot();
    let categories = DerivedData::new(&snapshot, &state.default_categories).all_categories();
    (StatusCode::OK, Json(CategoryListResponse { categories })).into_response()
}

pub async fn spending_by_category(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/spending/by-category");
    if let Err(response) = require_session(&state) {
        return response;
    }

    let snapshot = state.record_store.snapshot();
    let ranking = DerivedData::new(&snapshot, &state.default_categories).category_ranking();
    let response = SpendingByCategoryResponse {
        categories: InsightMapper::to_category_spending(ranking),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn spending_over_time(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/spending/over-time");
    if let Err(response) = require_session(&state) {
        return response;
    }

    let snapshot = state.record_store.snapshot();
    let series = DerivedData::new(&snapshot, &state.default_categories).spending_over_time();
    let response = SpendingOverTimeResponse {
        points: InsightMapper::to_daily_spending(series),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn dashboard_summary(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/dashboard/summary");
    if let Err(response) = require_session(&state) {
        return response;
    }

    let snapshot = state.record_store.snapshot();
    let summary = DerivedData::new(&snapshot, &state.default_categories).summary();
    (StatusCode::OK, Json(InsightMapper::to_dashboard_summary(summary))).into_response()
}

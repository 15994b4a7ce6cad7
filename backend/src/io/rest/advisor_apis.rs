//! # REST API for the AI advisor
//!
//! Thin pass-through to the configured [`AdvisoryService`]. Without one the
//! endpoints answer 503.
//!
//! [`AdvisoryService`]: crate::domain::AdvisoryService

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::domain::advisory::validate_description;
use crate::domain::{AdvisoryError, AdvisoryService};
use crate::io::rest::advisory_error_response;
use crate::AppState;
use shared::{FinancialTipsResponse, SuggestCategoryRequest, SuggestCategoryResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suggest-category", post(suggest_category))
        .route("/tips", get(financial_tips))
}

fn advisor(state: &AppState) -> Result<Arc<dyn AdvisoryService>, Response> {
    state.advisory.clone().ok_or_else(|| {
        advisory_error_response(
            "Advisor request",
            AdvisoryError::Unavailable("no advisor configured".to_string()),
        )
    })
}

pub async fn suggest_category(
    State(state): State<AppState>,
    Json(request): Json<SuggestCategoryRequest>,
) -> impl IntoResponse {
    info!("POST /api/advisor/suggest-category - description: {:?}", request.description);

    let description = match validate_description(&request.description) {
        Ok(description) => description,
        Err(e) => return advisory_error_response("Category suggestion rejected", e),
    };
    let advisor = match advisor(&state) {
        Ok(advisor) => advisor,
        Err(response) => return response,
    };

    match advisor.suggest_category(description).await {
        Ok(suggestion) => {
            let response = SuggestCategoryResponse {
                category: suggestion.category,
                confidence: suggestion.confidence,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => advisory_error_response("Category suggestion failed", e),
    }
}

pub async fn financial_tips(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/advisor/tips");

    let advisor = match advisor(&state) {
        Ok(advisor) => advisor,
        Err(response) => return response,
    };

    match advisor.financial_tips().await {
        Ok(tips) => (StatusCode::OK, Json(FinancialTipsResponse { tips: tips.tips })).into_response(),
        Err(e) => advisory_error_response("Financial tips failed", e),
    }
}

//! # REST API for budgets
//!
//! Budgets are returned with their spending figures computed from the
//! current expenses; only category and amount are ever stored.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use tracing::info;

use crate::domain::models::{Budget, BudgetProgress};
use crate::domain::DerivedData;
use crate::io::rest::mappers::budget_mapper::BudgetMapper;
use crate::io::rest::{require_session, store_error_response};
use crate::AppState;
use shared::{BudgetListResponse, CreateBudgetRequest, DeleteResponse, UpdateBudgetRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_budgets).post(create_budget))
        .route("/:id", put(update_budget).delete(delete_budget))
}

/// Progress for a single budget against the current expenses
fn progress_for(state: &AppState, budget: &Budget) -> BudgetProgress {
    let snapshot = state.record_store.snapshot();
    let derived = DerivedData::new(&snapshot, &state.default_categories);
    let spent = derived
        .spending_by_category()
        .get(&budget.category)
        .copied()
        .unwrap_or(0.0);
    BudgetProgress::new(budget, spent)
}

/// List budgets with progress, sorted by category
pub async fn list_budgets(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/budgets");
    if let Err(response) = require_session(&state) {
        return response;
    }

    let snapshot = state.record_store.snapshot();
    let progress = DerivedData::new(&snapshot, &state.default_categories).budget_progress();
    let response = BudgetListResponse {
        budgets: BudgetMapper::to_dto_list(progress),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn create_budget(
    State(state): State<AppState>,
    Json(request): Json<CreateBudgetRequest>,
) -> impl IntoResponse {
    info!("POST /api/budgets - request: {:?}", request);

    match state
        .record_store
        .add_budget(BudgetMapper::to_input(request))
        .await
    {
        Ok(budget) => {
            info!("Created budget {} for {}", budget.id, budget.category);
            let dto = BudgetMapper::to_dto(progress_for(&state, &budget));
            (StatusCode::CREATED, Json(dto)).into_response()
        }
        Err(e) => store_error_response("Failed to create budget", e),
    }
}

pub async fn update_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBudgetRequest>,
) -> impl IntoResponse {
    info!("PUT /api/budgets/{} - request: {:?}", id, request);

    match state
        .record_store
        .update_budget(&id, BudgetMapper::to_input(request))
        .await
    {
        Ok(budget) => {
            let dto = BudgetMapper::to_dto(progress_for(&state, &budget));
            (StatusCode::OK, Json(dto)).into_response()
        }
        Err(e) => store_error_response("Failed to update budget", e),
    }
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/budgets/{}", id);

    match state.record_store.delete_budget(&id).await {
        Ok(removed) => {
            let response = DeleteResponse {
                success_message: format!("Budget {} deleted", id),
                id,
                removed,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => store_error_response("Failed to delete budget", e),
    }
}

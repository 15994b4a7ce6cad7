//! # REST API for expenses
//!
//! Listing reads the current session snapshot. Create, update and delete go
//! through the record store, which persists before touching memory.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use tracing::info;

use crate::domain::DerivedData;
use crate::io::rest::mappers::expense_mapper::ExpenseMapper;
use crate::io::rest::{require_session, store_error_response};
use crate::AppState;
use shared::{
    CreateExpenseRequest, DeleteResponse, ExpenseListRequest, ExpenseListResponse,
    UpdateExpenseRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", put(update_expense).delete(delete_expense))
}

/// List expenses, most recent first, optionally for one category
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseListRequest>,
) -> impl IntoResponse {
    info!("GET /api/expenses - query: {:?}", query);
    if let Err(response) = require_session(&state) {
        return response;
    }

    let snapshot = state.record_store.snapshot();
    let expenses = match query.category.as_deref() {
        Some(category) => {
            let derived = DerivedData::new(&snapshot, &state.default_categories);
            ExpenseMapper::to_dto_list(derived.expenses_by_category(category))
        }
        None => ExpenseMapper::to_dto_list(&snapshot.expenses),
    };

    (StatusCode::OK, Json(ExpenseListResponse { expenses })).into_response()
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenses - request: {:?}", request);

    match state
        .record_store
        .add_expense(ExpenseMapper::to_input(request))
        .await
    {
        Ok(expense) => {
            info!("Created expense {}", expense.id);
            (StatusCode::CREATED, Json(ExpenseMapper::to_dto(expense))).into_response()
        }
        Err(e) => store_error_response("Failed to create expense", e),
    }
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
    info!("PUT /api/expenses/{} - request: {:?}", id, request);

    match state
        .record_store
        .update_expense(&id, ExpenseMapper::to_input(request))
        .await
    {
        Ok(expense) => (StatusCode::OK, Json(ExpenseMapper::to_dto(expense))).into_response(),
        Err(e) => store_error_response("Failed to update expense", e),
    }
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", id);

    match state.record_store.delete_expense(&id).await {
        Ok(removed) => {
            let response = DeleteResponse {
                success_message: format!("Expense {} deleted", id),
                id,
                removed,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => store_error_response("Failed to delete expense", e),
    }
}

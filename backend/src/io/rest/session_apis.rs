//! # REST API for the user session
//!
//! The identity provider (or the dashboard on its behalf) reports sign-in and
//! sign-out here; the dashboard polls `GET /api/session` to know when the
//! user's records are ready.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::domain::commands::session::Identity;
use crate::domain::models::ValidationError;
use crate::domain::StoreError;
use crate::io::rest::store_error_response;
use crate::AppState;
use shared::{SessionResponse, SignInRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_session))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
}

fn session_response(state: &AppState) -> SessionResponse {
    let status = state.record_store.status();
    let email = state
        .session_manager
        .current_identity()
        .filter(|identity| status.user_id.as_deref() == Some(identity.uid.as_str()))
        .and_then(|identity| identity.email);
    SessionResponse {
        loaded: status.loaded(),
        user_id: status.user_id,
        email,
        phase: status.phase,
    }
}

pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/session");
    (StatusCode::OK, Json(session_response(&state)))
}

/// Bind the session to a user and load their records
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> impl IntoResponse {
    info!("POST /api/session/sign-in - uid: {}", request.uid);

    let uid = request.uid.trim().to_string();
    if uid.is_empty() {
        return store_error_response(
            "Sign-in rejected",
            StoreError::InvalidInput(ValidationError::EmptyUserId),
        );
    }

    let identity = Identity {
        uid,
        email: request.email,
    };
    match state.session_manager.sign_in(identity).await {
        Ok(outcome) => {
            info!("Sign-in finished: {:?}", outcome);
            (StatusCode::OK, Json(session_response(&state))).into_response()
        }
        Err(e) => store_error_response("Failed to load session", e),
    }
}

pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/session/sign-out");
    state.session_manager.sign_out();
    (StatusCode::OK, Json(session_response(&state)))
}

//! # SpendWise Backend
//!
//! Expense and budget tracking for a signed-in user, served as a JSON API.
//!
//! ## Architecture
//!
//! ```text
//! Dashboard (browser)
//!     ↓
//! IO Layer (REST handlers, Genkit advisor client)
//!     ↓
//! Domain Layer (record store, derived data, session manager)
//!     ↓
//! Storage Layer (per-user CSV collections)
//! ```
//!
//! All mutation goes through the [`RecordStore`](domain::RecordStore) held in
//! [`AppState`]; aggregates are recomputed from its snapshot on every read.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{AdvisoryService, RecordStore, SessionManager};
use crate::io::{rest, GenkitClient};
use crate::storage::CsvConnection;

/// Shared state handed to every REST handler
#[derive(Clone)]
pub struct AppState {
    pub record_store: Arc<RecordStore<CsvConnection>>,
    pub session_manager: Arc<SessionManager<CsvConnection>>,
    /// `None` when no advisor URL is configured
    pub advisory: Option<Arc<dyn AdvisoryService>>,
    pub default_categories: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        connection: &CsvConnection,
        advisory: Option<Arc<dyn AdvisoryService>>,
        default_categories: Vec<String>,
    ) -> Self {
        let record_store = Arc::new(RecordStore::new(connection));
        let session_manager = Arc::new(SessionManager::new(Arc::clone(&record_store)));
        Self {
            record_store,
            session_manager,
            advisory,
            default_categories: Arc::new(default_categories),
        }
    }
}

/// Initialize the backend from configuration
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_dir.display());
    let connection = CsvConnection::new(&config.data_dir)?;

    let advisory: Option<Arc<dyn AdvisoryService>> = match &config.advisor_url {
        Some(url) => {
            info!("Using advisor at {}", url);
            Some(Arc::new(GenkitClient::new(url)?))
        }
        None => {
            info!("No advisor configured; advisor endpoints are disabled");
            None
        }
    };

    Ok(AppState::new(
        &connection,
        advisory,
        config.default_categories.clone(),
    ))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/session", rest::session_apis::router())
        .nest("/expenses", rest::expense_apis::router())
        .nest("/budgets", rest::budget_apis::router())
        .nest("/advisor", rest::advisor_apis::router())
        .merge(rest::insight_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdvisoryError, CategorySuggestion, FinancialTips};
    use crate::storage::csv::test_utils::TestEnvironment;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FixedAdvisor;

    #[async_trait]
    impl AdvisoryService for FixedAdvisor {
        async fn suggest_category(&self, description: &str) -> Result<CategorySuggestion, AdvisoryError> {
            Ok(CategorySuggestion {
                category: format!("Category for {}", description),
                confidence: 0.8,
            })
        }

        async fn financial_tips(&self) -> Result<FinancialTips, AdvisoryError> {
            Ok(FinancialTips {
                tips: vec!["Cook at home".to_string(), "Review subscriptions".to_string()],
            })
        }
    }

    fn test_app(env: &TestEnvironment, advisory: Option<Arc<dyn AdvisoryService>>) -> Router {
        let defaults = vec!["Other".to_string(), "Food & Drinks".to_string()];
        let state = AppState::new(&env.connection, advisory, defaults);
        create_router(state, "http://localhost:8080").unwrap()
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(body) => Body::from(body.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn signed_in_app(env: &TestEnvironment) -> Router {
        let app = test_app(env, None);
        let (status, _) = call(
            &app,
            "POST",
            "/api/session/sign-in",
            Some(json!({ "uid": "user-1", "email": "user@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        app
    }

    #[tokio::test]
    async fn test_sign_in_add_and_read_dashboard() {
        let env = TestEnvironment::new().unwrap();
        let app = signed_in_app(&env).await;

        let (status, session) = call(&app, "GET", "/api/session", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["user_id"], "user-1");
        assert_eq!(session["email"], "user@example.com");
        assert_eq!(session["phase"], "ready");
        assert_eq!(session["loaded"], true);

        let (status, food) = call(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({ "description": "Groceries", "amount": 75.5, "category": "Food", "date": "2024-05-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(food["id"].as_str().unwrap().starts_with("expense::"));
        assert_eq!(food["date"], "2024-05-01T00:00:00+00:00");

        let (status, _) = call(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({ "description": "Bus pass", "amount": 22.0, "category": "Transport", "date": "2024-05-02T09:30:00+02:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, budget) = call(
            &app,
            "POST",
            "/api/budgets",
            Some(json!({ "category": "Food", "amount": 100.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(budget["spent"], 75.5);
        assert_eq!(budget["remaining"], 24.5);
        assert_eq!(budget["status"], "warning");

        let (_, budgets) = call(&app, "GET", "/api/budgets", None).await;
        assert_eq!(budgets["budgets"].as_array().unwrap().len(), 1);
        let percent = budgets["budgets"][0]["progress_percent"].as_f64().unwrap();
        assert!((percent - 75.5).abs() < 1e-9);

        let (_, expenses) = call(&app, "GET", "/api/expenses", None).await;
        assert_eq!(expenses["expenses"][0]["description"], "Bus pass");
        assert_eq!(expenses["expenses"][1]["description"], "Groceries");

        let (_, filtered) = call(&app, "GET", "/api/expenses?category=Food", None).await;
        assert_eq!(filtered["expenses"].as_array().unwrap().len(), 1);

        let (_, summary) = call(&app, "GET", "/api/dashboard/summary", None).await;
        assert_eq!(summary["total_spending"], 97.5);
        assert_eq!(summary["top_category"], "Food");
        assert_eq!(summary["total_budgeted"], 100.0);
        assert_eq!(summary["expense_count"], 2);

        let (_, by_category) = call(&app, "GET", "/api/spending/by-category", None).await;
        assert_eq!(by_category["categories"][0]["category"], "Food");
        assert_eq!(by_category["categories"][1]["total"], 22.0);

        let (_, over_time) = call(&app, "GET", "/api/spending/over-time", None).await;
        assert_eq!(over_time["points"][0]["date"], "2024-05-01");
        assert_eq!(over_time["points"][1]["date"], "2024-05-02");

        let (_, categories) = call(&app, "GET", "/api/categories", None).await;
        assert_eq!(
            categories["categories"],
            json!(["Food", "Food & Drinks", "Other", "Transport"])
        );
    }

    #[tokio::test]
    async fn test_records_survive_a_new_session() {
        let env = TestEnvironment::new().unwrap();
        {
            let app = signed_in_app(&env).await;
            let (status, _) = call(
                &app,
                "POST",
                "/api/budgets",
                Some(json!({ "category": "Travel", "amount": 300.0 })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let app = signed_in_app(&env).await;
        let (_, budgets) = call(&app, "GET", "/api/budgets", None).await;
        assert_eq!(budgets["budgets"][0]["category"], "Travel");
        assert_eq!(budgets["budgets"][0]["spent"], 0.0);
    }

    #[tokio::test]
    async fn test_requests_without_session_are_unauthorized() {
        let env = TestEnvironment::new().unwrap();
        let app = test_app(&env, None);

        let (status, body) = call(&app, "GET", "/api/expenses", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "not_authenticated");

        let (status, _) = call(
            &app,
            "POST",
            "/api/budgets",
            Some(json!({ "category": "Food", "amount": 10.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&app, "GET", "/api/dashboard/summary", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call(&app, "POST", "/api/session/sign-in", Some(json!({ "uid": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");
    }

    #[tokio::test]
    async fn test_error_status_codes() {
        let env = TestEnvironment::new().unwrap();
        let app = signed_in_app(&env).await;

        let (status, _) = call(
            &app,
            "POST",
            "/api/budgets",
            Some(json!({ "category": "Food", "amount": 100.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            &app,
            "POST",
            "/api/budgets",
            Some(json!({ "category": "Food", "amount": 50.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "duplicate_category");

        let (status, body) = call(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({ "description": "", "amount": 5.0, "category": "Food", "date": "2024-05-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");

        let (status, _) = call(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({ "description": "Snack", "amount": 5.0, "category": "Food", "date": "yesterday" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            "PUT",
            "/api/expenses/expense::missing",
            Some(json!({ "description": "Snack", "amount": 5.0, "category": "Food", "date": "2024-05-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");

        let (status, body) = call(&app, "DELETE", "/api/budgets/budget::missing", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], false);
    }

    #[tokio::test]
    async fn test_update_and_delete_expense() {
        let env = TestEnvironment::new().unwrap();
        let app = signed_in_app(&env).await;

        let (_, created) = call(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({ "description": "Cinema", "amount": 12.0, "category": "Entertainment", "date": "2024-06-01" })),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = call(
            &app,
            "PUT",
            &format!("/api/expenses/{}", id),
            Some(json!({ "description": "Cinema and snacks", "amount": 18.0, "category": "Entertainment", "date": "2024-06-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], id.as_str());
        assert_eq!(updated["amount"], 18.0);

        let (status, deleted) = call(&app, "DELETE", &format!("/api/expenses/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["removed"], true);

        let (_, summary) = call(&app, "GET", "/api/dashboard/summary", None).await;
        assert_eq!(summary["total_spending"], 0.0);
        assert_eq!(summary["top_category"], Value::Null);
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let env = TestEnvironment::new().unwrap();
        let app = signed_in_app(&env).await;

        let (status, session) = call(&app, "POST", "/api/session/sign-out", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["user_id"], Value::Null);
        assert_eq!(session["phase"], "uninitialized");
        assert_eq!(session["loaded"], false);

        let (status, _) = call(&app, "GET", "/api/budgets", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_advisor_endpoints() {
        let env = TestEnvironment::new().unwrap();

        let disabled = test_app(&env, None);
        let (status, body) = call(&disabled, "GET", "/api/advisor/tips", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "advisor_unavailable");

        let app = test_app(&env, Some(Arc::new(FixedAdvisor)));
        let (status, body) = call(
            &app,
            "POST",
            "/api/advisor/suggest-category",
            Some(json!({ "description": "  Taxi home " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Category for Taxi home");
        assert_eq!(body["confidence"], 0.8);

        let (status, _) = call(
            &app,
            "POST",
            "/api/advisor/suggest-category",
            Some(json!({ "description": "ab" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&app, "GET", "/api/advisor/tips", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tips"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_cors_origin_is_rejected() {
        let env = TestEnvironment::new().unwrap();
        let state = AppState::new(&env.connection, None, Vec::new());
        assert!(create_router(state, "bad\norigin").is_err());
    }
}

//! HTTP request handlers for the fact-check API.
//!
//! Implements claim checking, record lookup, listing and health check
//! endpoints using axum.

use crate::response::{ErrorResponse, FactCheckResponse, HealthResponse, RecordResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use checkmate_domain::FactCheckId;
use checkmate_llm::ChatModel;
use checkmate_search::SearchTool;
use checkmate_store::SqliteStore;
use checkmate_verifier::{CheckError, FactChecker};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Default page size for `GET /api/fact-checks`
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Largest page size for `GET /api/fact-checks`
pub const MAX_LIST_LIMIT: usize = 500;

/// Checker type the server runs
pub type SharedChecker = FactChecker<Arc<dyn ChatModel>, Arc<dyn SearchTool>, SqliteStore>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Fact-check pipeline
    pub checker: Arc<SharedChecker>,
}

impl AppState {
    /// Wrap a checker
    pub fn new(checker: SharedChecker) -> Self {
        Self {
            checker: Arc::new(checker),
        }
    }
}

/// Query string of `GET /api/check-claims`
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    /// Claim to verify
    pub claim: Option<String>,
}

/// Query string of `GET /api/fact-checks`
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page size
    pub limit: Option<usize>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request is missing something
    BadRequest(String),
    /// No such record
    NotFound(String),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<CheckError> for AppError {
    fn from(e: CheckError) -> Self {
        match e {
            CheckError::EmptyClaim => AppError::BadRequest("No claim provided".to_string()),
            CheckError::Create(msg) => {
                error!(error = %msg, "Failed to create fact check");
                AppError::InternalError("Failed to save claim to database".to_string())
            }
            CheckError::Update { id, message } => {
                error!(id = %id, error = %message, "Failed to update fact check");
                AppError::InternalError("Failed to update fact check".to_string())
            }
            CheckError::Store(msg) => {
                error!(error = %msg, "Store read failed");
                AppError::InternalError("Failed to read fact checks".to_string())
            }
        }
    }
}

/// GET /api/check-claims?claim=... - Verify a claim
async fn check_claims(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<FactCheckResponse>, AppError> {
    let claim = query.claim.unwrap_or_default();
    info!(claim_len = claim.len(), "Processing claim");

    let record = state.checker.check(&claim).await?;
    Ok(Json(FactCheckResponse::from_record(&record)))
}

/// GET /api/fact-check/:id - Get a specific fact check
async fn get_fact_check(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecordResponse>, AppError> {
    match state.checker.get(FactCheckId::from_value(id)).await? {
        Some(record) => Ok(Json(RecordResponse::from(&record))),
        None => Err(AppError::NotFound("Fact check not found".to_string())),
    }
}

/// GET /api/fact-checks?limit=N - Most recent fact checks
async fn list_fact_checks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .min(MAX_LIST_LIMIT);
    let records = state.checker.recent(limit).await?;
    Ok(Json(records.iter().map(RecordResponse::from).collect()))
}

/// GET /api/health - Liveness check
async fn health_check() -> Json<HealthResponse> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        database: "SQLite".to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/api/check-claims", get(check_claims))
        .route("/api/fact-check/:id", get(get_fact_check))
        .route("/api/fact-checks", get(list_fact_checks))
        .route("/api/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

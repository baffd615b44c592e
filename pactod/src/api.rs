//! HTTP API for the Pacto daemon.
//!
//! Provides REST endpoints for:
//! - Health check
//! - Catalog (favor and reward types)
//! - Participant status
//! - Submit / review favors
//! - Submit / review redemptions
//!
//! Unmatched paths fall through to the static front-end when one is
//! configured.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use pacto_domain::RecordId;
use pacto_engine::{CatalogView, EngineError, StatusReport};
use pacto_store::LedgerStore;

use crate::error::DaemonError;
use crate::ledger_service::LedgerService;

// =============================================================================
// API State
// =============================================================================

/// Shared state for API handlers.
pub struct ApiState<S: LedgerStore + 'static> {
    pub ledger: Arc<RwLock<LedgerService<S>>>,
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Query for `/api/status`.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub user: String,
}

/// Request to log a favor.
#[derive(Debug, Deserialize)]
pub struct FavorRequest {
    #[serde(default)]
    pub user: String,
    #[serde(rename = "gestoId", default)]
    pub favor_type_id: String,
}

/// Request to review a favor.
#[derive(Debug, Deserialize)]
pub struct FavorReviewRequest {
    #[serde(default)]
    pub user: String,
    #[serde(rename = "gestoDbId", default, deserialize_with = "lenient_record_id")]
    pub record_id: Option<RecordId>,
    #[serde(default)]
    pub action: String,
}

/// Request to redeem a reward.
#[derive(Debug, Deserialize)]
pub struct RedemptionRequest {
    #[serde(default)]
    pub user: String,
    #[serde(rename = "canjeId", default)]
    pub reward_type_id: String,
}

/// Request to review a redemption.
#[derive(Debug, Deserialize)]
pub struct RedemptionReviewRequest {
    #[serde(default)]
    pub user: String,
    #[serde(rename = "canjeDbId", default, deserialize_with = "lenient_record_id")]
    pub record_id: Option<RecordId>,
    #[serde(default)]
    pub action: String,
}

/// Acknowledgment of a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl OkResponse {
    fn ok() -> Self {
        Self { ok: true, status: None }
    }

    fn with_status(status: impl Into<String>) -> Self {
        Self {
            ok: true,
            status: Some(status.into()),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Record ids arrive as JSON numbers. An integral number (`3` or `3.0`) is
/// taken as the id; any other value matches no record.
fn lenient_record_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as RecordId)
        }),
        _ => None,
    })
}

// =============================================================================
// Router
// =============================================================================

/// Create the API router.
pub fn create_router<S>(state: Arc<ApiState<S>>, static_dir: Option<&Path>) -> Router
where
    S: LedgerStore + 'static,
{
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/config", get(config_handler::<S>))
        .route("/api/status", get(status_handler::<S>))
        .route("/api/gesto", post(submit_favor_handler::<S>))
        .route("/api/review", post(review_favor_handler::<S>))
        .route("/api/canje", post(submit_redemption_handler::<S>))
        .route("/api/canje-review", post(review_redemption_handler::<S>))
        .with_state(state);

    let router = match static_dir {
        Some(dir) if dir.is_dir() => router.fallback_service(ServeDir::new(dir)),
        Some(dir) => {
            warn!(static_dir = %dir.display(), "Static directory not found, serving API only");
            router
        }
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Favor and reward catalogs.
async fn config_handler<S>(State(state): State<Arc<ApiState<S>>>) -> Json<CatalogView>
where
    S: LedgerStore + 'static,
{
    let service = state.ledger.read().await;
    Json(service.config())
}

/// Status for one participant.
async fn status_handler<S>(
    State(state): State<Arc<ApiState<S>>>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<StatusReport>
where
    S: LedgerStore + 'static,
{
    let service = state.ledger.read().await;
    let report = service.status(&query.user).await.map_err(to_error_response)?;
    Ok(Json(report))
}

/// Log a favor.
async fn submit_favor_handler<S>(
    State(state): State<Arc<ApiState<S>>>,
    payload: Result<Json<FavorRequest>, JsonRejection>,
) -> ApiResult<OkResponse>
where
    S: LedgerStore + 'static,
{
    let Json(req) = payload.map_err(malformed_body)?;
    let service = state.ledger.write().await;
    service
        .submit_favor(&req.user, &req.favor_type_id)
        .await
        .map_err(to_error_response)?;
    Ok(Json(OkResponse::ok()))
}

/// Approve or dispute a favor.
async fn review_favor_handler<S>(
    State(state): State<Arc<ApiState<S>>>,
    payload: Result<Json<FavorReviewRequest>, JsonRejection>,
) -> ApiResult<OkResponse>
where
    S: LedgerStore + 'static,
{
    let Json(req) = payload.map_err(malformed_body)?;
    let service = state.ledger.write().await;
    // Ids start at 1, so a missing id never matches a record
    let status = service
        .review_favor(&req.user, req.record_id.unwrap_or(0), &req.action)
        .await
        .map_err(to_error_response)?;
    Ok(Json(OkResponse::with_status(status.as_str())))
}

/// Request a reward.
async fn submit_redemption_handler<S>(
    State(state): State<Arc<ApiState<S>>>,
    payload: Result<Json<RedemptionRequest>, JsonRejection>,
) -> ApiResult<OkResponse>
where
    S: LedgerStore + 'static,
{
    let Json(req) = payload.map_err(malformed_body)?;
    let service = state.ledger.write().await;
    service
        .submit_redemption(&req.user, &req.reward_type_id)
        .await
        .map_err(to_error_response)?;
    Ok(Json(OkResponse::ok()))
}

/// Approve or reject a redemption.
async fn review_redemption_handler<S>(
    State(state): State<Arc<ApiState<S>>>,
    payload: Result<Json<RedemptionReviewRequest>, JsonRejection>,
) -> ApiResult<OkResponse>
where
    S: LedgerStore + 'static,
{
    let Json(req) = payload.map_err(malformed_body)?;
    let service = state.ledger.write().await;
    service
        .review_redemption(&req.user, req.record_id.unwrap_or(0), &req.action)
        .await
        .map_err(to_error_response)?;
    Ok(Json(OkResponse::ok()))
}

// =============================================================================
// Helpers
// =============================================================================

fn malformed_body(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    warn!(error = %rejection.body_text(), "Malformed request body");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: rejection.body_text(),
        }),
    )
}

fn to_error_response(error: DaemonError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        DaemonError::Engine(EngineError::RecordNotFound { .. }) => StatusCode::NOT_FOUND,
        DaemonError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        DaemonError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

// =============================================================================
// Tests
// =============================================================================

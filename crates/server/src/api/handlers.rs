use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use arrshim_core::{reconcile as run_reconcile, AppPreferences, ReconcileReport};

use super::{ApiError, SuccessResponse};
use crate::state::AppState;

/// Reported qBittorrent application version.
pub const APP_VERSION: &str = "4.1.3";

/// Reported qBittorrent Web API version.
pub const WEBAPI_VERSION: &str = "2.2.8";

/// Session id handed out by login. Sessions are never checked.
pub const SESSION_ID: &str = "01234678910111213141617";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// POST /api/v2/auth/login
///
/// Always succeeds; credentials are not checked.
pub async fn login() -> impl IntoResponse {
    (
        [(SET_COOKIE, format!("SID={}; Path=/", SESSION_ID))],
        "Ok.",
    )
}

/// GET /api/v2/app/version
pub async fn version() -> &'static str {
    APP_VERSION
}

/// GET /api/v2/app/webapiVersion
pub async fn webapi_version() -> &'static str {
    WEBAPI_VERSION
}

/// GET /api/v2/app/preferences
pub async fn preferences(State(state): State<Arc<AppState>>) -> Json<AppPreferences> {
    Json(state.mapper().preferences())
}

/// Endpoints the engine has no equivalent for.
pub async fn accepted() -> Json<SuccessResponse> {
    SuccessResponse::new("Accepted")
}

/// POST /shim/reconcile
///
/// Run a reconciliation pass now and return its report.
pub async fn reconcile(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReconcileReport>, ApiError> {
    info!("Reconciliation requested");
    let report = run_reconcile(state.engine(), state.store(), state.default_category()).await?;
    Ok(Json(report))
}

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{categories, handlers, torrents};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // qBittorrent Web API v2 surface
    let api_routes = Router::new()
        // Session and application
        .route("/auth/login", post(handlers::login))
        .route("/app/version", get(handlers::version))
        .route("/app/webapiVersion", get(handlers::webapi_version))
        .route("/app/preferences", get(handlers::preferences))
        // Torrents
        .route("/torrents/info", get(torrents::info))
        .route("/torrents/properties", get(torrents::properties))
        .route("/torrents/files", get(torrents::files))
        .route("/torrents/add", post(torrents::add))
        .route("/torrents/delete", post(torrents::delete))
        .route("/torrents/pause", post(torrents::pause))
        .route("/torrents/stop", post(torrents::pause))
        .route("/torrents/resume", post(torrents::resume))
        .route("/torrents/start", post(torrents::resume))
        .route("/torrents/recheck", post(torrents::recheck))
        // Accepted for compatibility, no effect on the engine
        .route("/torrents/setCategory", post(handlers::accepted))
        .route("/torrents/setShareLimits", post(handlers::accepted))
        .route("/torrents/topPrio", post(handlers::accepted))
        .route("/torrents/setForceStart", post(handlers::accepted))
        // Categories
        .route("/torrents/categories", get(categories::list_categories))
        .route("/torrents/createCategory", post(categories::create_category));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/shim/reconcile", post(handlers::reconcile))
        .nest("/api/v2", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

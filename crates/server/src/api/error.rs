//! Error responses for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use arrshim_core::{EngineError, ReconcileError, StoreError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(e) => engine_status(e),
            ApiError::Store(e) => store_status(e),
            ApiError::Reconcile(ReconcileError::Engine(e)) => engine_status(e),
            ApiError::Reconcile(ReconcileError::Store(e)) => store_status(e),
        }
    }
}

fn engine_status(e: &EngineError) -> StatusCode {
    match e {
        EngineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Remote { .. } => StatusCode::BAD_GATEWAY,
        EngineError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

fn store_status(e: &StoreError) -> StatusCode {
    match e {
        StoreError::CategoryNotFound(_) => StatusCode::CONFLICT,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), "Request failed: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

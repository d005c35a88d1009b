//! Shared server state, error responder, and the health check.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{CatalogError, CatalogService};
use crate::events::SubscriberRegistry;

/// Shared server state
pub struct ServerState {
    pub catalog: Arc<CatalogService>,
    pub registry: Arc<SubscriberRegistry>,
}

pub type CatalogState = Arc<ServerState>;

// ============================================================================
// Health check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub subscribers: usize,
}

pub async fn health(State(state): State<CatalogState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        subscribers: state.registry.subscriber_count(),
    })
}

// ============================================================================
// Error responder
// ============================================================================

pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => AppError::NotFound(err.to_string()),
            CatalogError::ReferenceNotFound { .. } => AppError::BadRequest(err.to_string()),
            CatalogError::ReferentialConflict { .. } => AppError::Conflict(err.to_string()),
            CatalogError::UnsupportedKind(_) | CatalogError::Store(_) => {
                AppError::Internal(anyhow::anyhow!(err))
            }
        }
    }
}

impl From<crate::catalog::models::ValidationError> for AppError {
    fn from(err: crate::catalog::models::ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

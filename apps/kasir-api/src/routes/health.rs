//! Root and health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Welcome {
    pub message: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// `GET /`
pub async fn root() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to Kasir API",
        status: "running",
    })
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(e) = state.transactions.ping().await {
        warn!(error = %e, "Health check failed");
        return Err(ApiError::new(
            ErrorCode::ServiceUnavailable,
            "Storage is unreachable",
        ));
    }

    Ok(Json(HealthStatus { status: "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::memory_state;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_root() {
        let Json(body) = root().await;
        assert_eq!(body.status, "running");
    }

    #[tokio::test]
    async fn test_health_ok() {
        let response = health(State(memory_state(false))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

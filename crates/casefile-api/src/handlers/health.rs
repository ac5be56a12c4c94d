//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let blobs = &state.filestore.blobs;
    let healthy = blobs.health_check().await.unwrap_or(false);

    Json(ApiResponse::ok(HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        blob_store: blobs.provider_type().to_string(),
        blob_store_healthy: healthy,
    }))
}

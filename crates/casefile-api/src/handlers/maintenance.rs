//! On-demand maintenance.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use casefile_service::SweepReport;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/maintenance/sweep
pub async fn sweep(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SweepReport>>, ApiError> {
    let report = state.filestore.sweeper.sweep(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(report)))
}

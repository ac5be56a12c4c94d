//! Case-level handlers: initialization, tree, breadcrumbs, stats.

use axum::Json;
use axum::extract::{Path, Query, State};

use casefile_entity::folder::{Breadcrumb, FolderNode, FolderTree};
use casefile_entity::stats::CaseStats;

use crate::dto::request::PathQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{Advisor, parse_case_id};
use crate::state::AppState;

/// POST /api/cases/{case_id}/initialize
pub async fn initialize_case(
    State(state): State<AppState>,
    advisor: Advisor,
    Path(case_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<FolderNode>>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let roots = state
        .filestore
        .initializer
        .initialize(&advisor, case_id)
        .await?;
    Ok(Json(ApiResponse::ok(roots)))
}

/// GET /api/cases/{case_id}/tree
pub async fn get_tree(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Result<Json<ApiResponse<FolderTree>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let tree = state.filestore.tree.get_tree(case_id).await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// GET /api/cases/{case_id}/breadcrumbs?path=...
pub async fn breadcrumbs(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Query(query): Query<PathQuery>,
) -> Result<Json<ApiResponse<Vec<Breadcrumb>>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let trail = state
        .filestore
        .folders
        .resolve_breadcrumbs(case_id, &query.path)
        .await?;
    Ok(Json(ApiResponse::ok(trail)))
}

/// GET /api/cases/{case_id}/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Result<Json<ApiResponse<CaseStats>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let stats = state.filestore.stats.get_stats(case_id).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

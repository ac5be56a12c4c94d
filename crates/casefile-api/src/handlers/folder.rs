//! Folder handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use casefile_entity::folder::FolderNode;
use casefile_service::DeleteFolderReport;

use crate::dto::request::{CreateFolderRequest, DeleteFolderQuery, ParentQuery, PathQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{Advisor, parse_case_id};
use crate::state::AppState;

/// GET /api/cases/{case_id}/folders?parent=...
pub async fn list_children(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Query(query): Query<ParentQuery>,
) -> Result<Json<ApiResponse<Vec<FolderNode>>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let children = state
        .filestore
        .folders
        .list_children(case_id, query.parent.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(children)))
}

/// POST /api/cases/{case_id}/folders
pub async fn create_folder(
    State(state): State<AppState>,
    advisor: Advisor,
    Path(case_id): Path<String>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FolderNode>>), ApiError> {
    let case_id = parse_case_id(&case_id)?;
    req.validate()?;

    let folder = state
        .filestore
        .folders
        .create_folder(&advisor, case_id, req.parent.as_deref(), &req.name)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// GET /api/cases/{case_id}/folders/resolve?path=...
pub async fn resolve_path(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Query(query): Query<PathQuery>,
) -> Result<Json<ApiResponse<FolderNode>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let folder = state
        .filestore
        .folders
        .resolve_path(case_id, &query.path)
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/cases/{case_id}/folders?path=...&force=...
pub async fn delete_folder(
    State(state): State<AppState>,
    advisor: Advisor,
    Path(case_id): Path<String>,
    Query(query): Query<DeleteFolderQuery>,
) -> Result<Json<ApiResponse<DeleteFolderReport>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let report = state
        .filestore
        .folders
        .delete_folder(&advisor, case_id, &query.path, query.force)
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}

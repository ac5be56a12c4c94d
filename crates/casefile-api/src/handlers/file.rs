//! File list, upload, download, and metadata handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use futures::TryStreamExt;
use validator::Validate;

use casefile_core::error::AppError;
use casefile_core::traits::storage::ByteStream;
use casefile_service::UploadRequest;

use crate::dto::request::{CategoryRequest, FolderQuery, TagsRequest, UploadQuery};
use crate::dto::response::{ApiResponse, FileResponse};
use crate::error::ApiError;
use crate::extractors::{Advisor, RequiredAdvisor, parse_case_id, parse_file_id};
use crate::state::AppState;

/// GET /api/cases/{case_id}/files?folder=...
pub async fn list_files(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Query(query): Query<FolderQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let files = state
        .filestore
        .files
        .list_files_in_folder(case_id, &query.folder)
        .await?;
    Ok(Json(ApiResponse::ok(
        files.into_iter().map(FileResponse::from).collect(),
    )))
}

/// POST /api/cases/{case_id}/files?folder=...&filename=...
///
/// The body is the raw file content; `Content-Type` and `Content-Length`
/// describe it.
pub async fn upload_file(
    State(state): State<AppState>,
    advisor: RequiredAdvisor,
    Path(case_id): Path<String>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, Json<ApiResponse<FileResponse>>), ApiError> {
    let case_id = parse_case_id(&case_id)?;
    query.validate()?;

    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::validation("Content-Type header is required"))?
        .to_string();
    let declared_size = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or_else(|| AppError::validation("Content-Length header is required"))?;

    let stream: ByteStream = Box::pin(body.into_data_stream().map_err(std::io::Error::other));

    let record = state
        .filestore
        .uploads
        .upload(
            &advisor,
            UploadRequest {
                case_id,
                folder_path: query.folder.clone(),
                filename: query.filename.clone(),
                mime_type,
                declared_size,
                is_generated: query.generated,
                document_category: query.category.clone(),
                tags: query.tag_list(),
            },
            stream,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(FileResponse::from(record))),
    ))
}

/// GET /api/cases/{case_id}/files/{file_id}
pub async fn get_file(
    State(state): State<AppState>,
    Path((case_id, file_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let file_id = parse_file_id(&file_id)?;
    let record = state.filestore.files.get_file(case_id, file_id).await?;
    Ok(Json(ApiResponse::ok(FileResponse::from(record))))
}

/// GET /api/cases/{case_id}/files/{file_id}/content
pub async fn download_file(
    State(state): State<AppState>,
    Path((case_id, file_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let file_id = parse_file_id(&file_id)?;
    let (record, stream) = state.filestore.files.download_file(case_id, file_id).await?;

    let filename = record.original_filename.replace('"', "");
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, record.mime_type)
        .header(header::CONTENT_LENGTH, record.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// PUT /api/cases/{case_id}/files/{file_id}/tags
pub async fn set_tags(
    State(state): State<AppState>,
    advisor: Advisor,
    Path((case_id, file_id)): Path<(String, String)>,
    Json(req): Json<TagsRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let file_id = parse_file_id(&file_id)?;
    req.validate()?;

    let record = state
        .filestore
        .files
        .tag_file(&advisor, case_id, file_id, &req.tags)
        .await?;
    Ok(Json(ApiResponse::ok(FileResponse::from(record))))
}

/// PUT /api/cases/{case_id}/files/{file_id}/category
pub async fn set_category(
    State(state): State<AppState>,
    advisor: Advisor,
    Path((case_id, file_id)): Path<(String, String)>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let file_id = parse_file_id(&file_id)?;

    let record = state
        .filestore
        .files
        .set_category(&advisor, case_id, file_id, req.category.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(FileResponse::from(record))))
}

//! File upload, listing, update, deletion and token download handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;

use blockshare_core::error::AppError;
use blockshare_core::types::pagination::PageResponse;
use blockshare_service::FileMeta;

use crate::dto::request::{OwnerFilter, UpdateFileBody, UpdateFileQuery};
use crate::dto::response::FileResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";
const FALLBACK_MIME: &str = "application/octet-stream";

/// POST /api/v1/files/upload
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileResponse>), ApiError> {
    let mut upload: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {}", e.body_text())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field
            .content_type()
            .unwrap_or(FALLBACK_MIME)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {}", e.body_text())))?;
        upload = Some((file_name, mime_type, data));
        break;
    }

    let (file_name, mime_type, data) =
        upload.ok_or_else(|| AppError::validation("Missing multipart field 'file'"))?;

    let meta = FileMeta {
        size_bytes: i64::try_from(data.len())
            .map_err(|_| AppError::validation("File too large"))?,
        mime_type,
    };

    let file = state
        .file_service
        .upload(data, &file_name, meta, auth.id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FileResponse::from_file(&state, file)),
    ))
}

/// GET /api/v1/files?owner_id=&page=&limit=
pub async fn list_files(
    State(state): State<AppState>,
    Query(filter): Query<OwnerFilter>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<FileResponse>>, ApiError> {
    let page = params.into_page_request(state.config.files.default_page_size);
    let result = state.file_service.list(filter.owner_id, &page).await?;
    Ok(Json(
        result.map(|view| FileResponse::with_owner(&state, view)),
    ))
}

/// GET /api/v1/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FileResponse>, ApiError> {
    let file = state.file_service.get_by_id(id).await?;
    Ok(Json(FileResponse::from_file(&state, file)))
}

/// PATCH /api/v1/files/{id}?request_id=
pub async fn update_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<UpdateFileQuery>,
    Json(body): Json<UpdateFileBody>,
) -> Result<Json<FileResponse>, ApiError> {
    let file = state
        .file_service
        .update(id, body.into(), auth.id, query.answered_request())
        .await?;
    Ok(Json(FileResponse::from_file(&state, file)))
}

/// DELETE /api/v1/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.file_service.delete(id, auth.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/files/download/{token}
pub async fn download_file(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let content = state.file_service.resolve_by_token(&token).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content.file.mime_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "inline; filename=\"{}\"",
                disposition_filename(&content.file.name)
            ),
        )
        .header(header::CONTENT_LENGTH, content.data.len())
        .body(Body::from(content.data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// Reduces a stored name to something safe inside a quoted header value.
fn disposition_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

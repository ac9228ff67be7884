//! File request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use blockshare_core::types::pagination::PageResponse;

use crate::dto::request::{CreateRequestBody, OwnerFilter};
use crate::dto::response::FileRequestResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/v1/requests?owner_id=&page=&limit=
///
/// `owner_id` filters by the request author.
pub async fn list_requests(
    State(state): State<AppState>,
    Query(filter): Query<OwnerFilter>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<FileRequestResponse>>, ApiError> {
    let page = params.into_page_request(state.config.files.default_page_size);
    let result = state.request_service.list(filter.owner_id, &page).await?;
    Ok(Json(result.map(|details| {
        FileRequestResponse::from_details(&state, details)
    })))
}

/// POST /api/v1/requests/files/{id}
pub async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CreateRequestBody>,
) -> Result<(StatusCode, Json<FileRequestResponse>), ApiError> {
    let details = state
        .request_service
        .create(file_id, body.into(), auth.id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(FileRequestResponse::from_details(&state, details)),
    ))
}

/// DELETE /api/v1/requests/{id}
pub async fn reject_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.request_service.reject(id, auth.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

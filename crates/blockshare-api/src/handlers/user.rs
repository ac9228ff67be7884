//! User lookup handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use blockshare_core::types::pagination::PageResponse;
use blockshare_entity::user::User;

use crate::error::ApiError;
use crate::extractors::PaginationParams;
use crate::state::AppState;

/// GET /api/v1/users?page=&limit=
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<User>>, ApiError> {
    let page = params.into_page_request(state.config.files.default_page_size);
    Ok(Json(state.user_service.list(&page).await?))
}

/// GET /api/v1/users/{email}
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service.get_by_email(&email).await?))
}

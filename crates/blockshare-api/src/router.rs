//! Route definitions for the BlockShare HTTP API.
//!
//! Domain routes are mounted under `/api/v1`; the health probe lives at
//! `/api/health`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with every route and the per-request logging.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.server.max_upload_bytes).unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .merge(file_routes())
        .merge(request_routes())
        .merge(user_routes());

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/api/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Upload, listing, owner mutations and token download
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/upload", post(handlers::file::upload_file))
        .route(
            "/files/download/{token}",
            get(handlers::file::download_file),
        )
        .route(
            "/files/{id}",
            get(handlers::file::get_file)
                .patch(handlers::file::update_file)
                .delete(handlers::file::delete_file),
        )
}

/// Block/unblock requests
fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/requests", get(handlers::request::list_requests))
        .route(
            "/requests/files/{id}",
            post(handlers::request::create_request),
        )
        .route("/requests/{id}", delete(handlers::request::reject_request))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/{email}", get(handlers::user::get_user))
}


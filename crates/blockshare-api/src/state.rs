//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use blockshare_auth::JwtDecoder;
use blockshare_core::config::AppConfig;
use blockshare_database::Database;
use blockshare_service::{FileRequestService, FileService, ServiceContainer, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or cheap to clone.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Storage backend, used for health checks
    pub database: Database,
    /// Process start time
    pub started_at: Instant,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// File service
    pub file_service: Arc<FileService>,
    /// File request service
    pub request_service: Arc<FileRequestService>,
    /// User service
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Assemble state from the loaded configuration, backend, and services.
    pub fn new(config: AppConfig, database: Database, services: &ServiceContainer) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        Self {
            config: Arc::new(config),
            database,
            started_at: Instant::now(),
            jwt_decoder,
            file_service: services.files.clone(),
            request_service: services.requests.clone(),
            user_service: services.users.clone(),
        }
    }

    /// Public download link for a token.
    pub fn download_url(&self, token: &str) -> String {
        format!(
            "{}/api/v1/files/download/{token}",
            self.config.server.public_url.trim_end_matches('/')
        )
    }
}

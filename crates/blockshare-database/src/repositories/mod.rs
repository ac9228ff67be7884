//! Repository traits and their PostgreSQL implementations.
//!
//! Services depend on the traits only; the backend is chosen once at
//! startup (see [`crate::backend::Database`]).

pub mod file;
pub mod request;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use blockshare_core::error::{AppError, ErrorKind};
use blockshare_core::result::AppResult;
use blockshare_core::types::pagination::{PageRequest, PageResponse};
use blockshare_entity::file::{CreateFile, File, FileContent, FileStatus};
use blockshare_entity::request::{FileRequest, FileRequestDetails, UpsertFileRequest};
use blockshare_entity::user::{CreateUser, User};

pub use file::PgFileRepository;
pub use request::PgFileRequestRepository;
pub use user::PgUserRepository;

/// Access to provisioned users.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert a user or refresh its email and name.
    async fn upsert(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users, ordered by email.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>>;
}

/// Access to file records and payloads.
#[async_trait]
pub trait FileRepository: Send + Sync + 'static {
    /// Insert a new file. Fails with `Conflict` when the token is taken.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Find a file by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Find a file by its download token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<File>>;

    /// Find a file and its payload by download token.
    async fn find_content_by_token(&self, token: &str) -> AppResult<Option<FileContent>>;

    /// List files, optionally restricted to one owner, most recently
    /// downloaded first.
    async fn find_page(
        &self,
        owner_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<File>>;

    /// Set a file's status and return the updated row.
    async fn update_status(&self, id: Uuid, status: FileStatus) -> AppResult<Option<File>>;

    /// Increment the download counter and stamp `downloaded_at`.
    async fn record_download(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Delete a file. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete every file last downloaded before `cutoff`.
    async fn delete_downloaded_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Load the owners of the given files' owner ids.
    async fn find_owners(&self, owner_ids: &[Uuid]) -> AppResult<Vec<User>>;
}

/// Access to file requests.
#[async_trait]
pub trait FileRequestRepository: Send + Sync + 'static {
    /// Insert a request, or overwrite the existing one for the same
    /// `(user_id, file_id)` pair.
    async fn upsert(&self, data: &UpsertFileRequest) -> AppResult<FileRequest>;

    /// Find a request by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<FileRequest>>;

    /// Find a request with its author and file loaded.
    async fn find_details(&self, id: i64) -> AppResult<Option<FileRequestDetails>>;

    /// List requests, optionally restricted to one author, most recently
    /// updated first.
    async fn find_page(
        &self,
        user_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<FileRequestDetails>>;

    /// Delete a request. Returns `true` if a row was removed.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// Map a sqlx error, surfacing unique violations as `Conflict`.
pub(crate) fn map_sqlx_error(err: sqlx::Error, context: &str) -> AppError {
    let unique = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
    if unique {
        AppError::with_source(
            ErrorKind::Conflict,
            format!("{context}: unique constraint violated"),
            err,
        )
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), err)
    }
}

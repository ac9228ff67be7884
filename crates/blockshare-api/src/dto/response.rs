//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blockshare_entity::file::{File, FileStatus, FileWithOwner};
use blockshare_entity::request::{ActionType, FileRequestDetails};
use blockshare_entity::user::User;

use crate::state::AppState;

/// A file as shown to clients. The download token only appears inside
/// `download_url`; the download counter is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    /// File ID.
    pub id: Uuid,
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
    /// Current status.
    pub status: FileStatus,
    /// Public link for downloading the file.
    pub download_url: String,
    /// Last download, or the upload time if never downloaded.
    pub downloaded_at: DateTime<Utc>,
    /// Owner ID.
    pub owner_id: Uuid,
    /// Owner, on unfiltered listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl FileResponse {
    /// Builds the client view of a file.
    pub fn from_file(state: &AppState, file: File) -> Self {
        Self::with_owner(state, FileWithOwner { file, owner: None })
    }

    /// Builds the client view of a file with its owner.
    pub fn with_owner(state: &AppState, view: FileWithOwner) -> Self {
        let FileWithOwner { file, owner } = view;
        Self {
            download_url: state.download_url(&file.download_token),
            id: file.id,
            name: file.name,
            size_bytes: file.size_bytes,
            mime_type: file.mime_type,
            status: file.status,
            downloaded_at: file.downloaded_at,
            owner_id: file.owner_id,
            owner,
            created_at: file.created_at,
        }
    }
}

/// A file request with its author and target file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRequestResponse {
    /// Request ID.
    pub id: i64,
    /// Reason.
    pub reason: String,
    /// Requested action.
    pub action_type: ActionType,
    /// Author ID.
    pub user_id: Uuid,
    /// Target file ID.
    pub file_id: Uuid,
    /// Author.
    pub user: User,
    /// Target file.
    pub file: FileResponse,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Updated at.
    pub updated_at: DateTime<Utc>,
}

impl FileRequestResponse {
    /// Builds the client view of a request.
    pub fn from_details(state: &AppState, details: FileRequestDetails) -> Self {
        let FileRequestDetails {
            request,
            user,
            file,
        } = details;
        Self {
            id: request.id,
            reason: request.reason,
            action_type: request.action_type,
            user_id: request.user_id,
            file_id: request.file_id,
            user,
            file: FileResponse::from_file(state, file),
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Version.
    pub version: String,
    /// Storage backend name.
    pub backend: String,
    /// `connected` or `unavailable`.
    pub database: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

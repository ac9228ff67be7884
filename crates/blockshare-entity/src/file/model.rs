//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::FileStatus;
use crate::user::User;

/// An uploaded file, without its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// Original file name as uploaded.
    pub name: String,
    /// Payload size in bytes.
    pub size_bytes: i64,
    /// MIME type reported at upload.
    pub mime_type: String,
    /// Capability token granting anonymous download.
    pub download_token: String,
    /// Current status.
    pub status: FileStatus,
    /// Last download (or the upload time if never downloaded).
    pub downloaded_at: DateTime<Utc>,
    /// Number of token downloads. Internal only.
    #[serde(skip_serializing, default)]
    pub download_count: i64,
    /// The uploading user.
    pub owner_id: Uuid,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
}

impl File {
    /// Whether `user_id` owns this file.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// Payload size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
    /// Pre-generated download token.
    pub download_token: String,
    /// The uploading user.
    pub owner_id: Uuid,
    /// Raw payload.
    pub data: Vec<u8>,
}

/// A file together with its payload, loaded only on the download path.
#[derive(Debug, Clone, FromRow)]
pub struct FileContent {
    /// The file record.
    #[sqlx(flatten)]
    pub file: File,
    /// Raw payload.
    pub data: Vec<u8>,
}

/// A file with its owner loaded, used by unfiltered listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileWithOwner {
    /// The file record.
    #[serde(flatten)]
    pub file: File,
    /// The owner, present when the listing loads it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
}

//! File request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::ActionType;
use crate::file::File;
use crate::user::User;

/// A user's pending request for an action on someone's file.
///
/// At most one row exists per `(user_id, file_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileRequest {
    /// Sequential identifier.
    pub id: i64,
    /// Free-text justification.
    pub reason: String,
    /// Requested action.
    pub action_type: ActionType,
    /// The requesting user.
    pub user_id: Uuid,
    /// The target file.
    pub file_id: Uuid,
    /// When the request was first made.
    pub created_at: DateTime<Utc>,
    /// When the request was last re-submitted.
    pub updated_at: DateTime<Utc>,
}

/// Insert-or-update payload keyed by `(user_id, file_id)`.
#[derive(Debug, Clone)]
pub struct UpsertFileRequest {
    /// Free-text justification.
    pub reason: String,
    /// Requested action.
    pub action_type: ActionType,
    /// The requesting user.
    pub user_id: Uuid,
    /// The target file.
    pub file_id: Uuid,
}

/// A request with its author and target file loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRequestDetails {
    /// The request row.
    #[serde(flatten)]
    pub request: FileRequest,
    /// The requesting user.
    pub user: User,
    /// The target file.
    pub file: File,
}

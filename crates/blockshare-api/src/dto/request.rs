//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use blockshare_entity::file::FileStatus;
use blockshare_entity::request::ActionType;
use blockshare_service::{CreateFileRequest, UpdateFile};

/// `?owner_id=` filter for list endpoints. Absent or nil means everyone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerFilter {
    /// Restrict to this user's rows.
    pub owner_id: Option<Uuid>,
}

/// Body of `PATCH /files/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFileBody {
    /// New status.
    pub status: FileStatus,
}

impl From<UpdateFileBody> for UpdateFile {
    fn from(body: UpdateFileBody) -> Self {
        Self {
            status: body.status,
        }
    }
}

/// Query of `PATCH /files/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFileQuery {
    /// The request this update answers, if any.
    pub request_id: Option<i64>,
}

impl UpdateFileQuery {
    /// The answered request. Zero and negative ids mean none.
    pub fn answered_request(&self) -> Option<i64> {
        self.request_id.filter(|id| *id > 0)
    }
}

/// Body of `POST /requests/files/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRequestBody {
    /// Why the action is wanted.
    #[validate(length(min = 1, max = 2000, message = "Reason is required"))]
    pub reason: String,
    /// Requested action, `block` when omitted.
    #[serde(default)]
    pub action_type: ActionType,
}

impl From<CreateRequestBody> for CreateFileRequest {
    fn from(body: CreateRequestBody) -> Self {
        Self {
            reason: body.reason,
            action_type: body.action_type,
        }
    }
}

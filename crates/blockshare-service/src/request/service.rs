//! File request service.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use blockshare_auth::require_owner;
use blockshare_core::error::AppError;
use blockshare_core::result::AppResult;
use blockshare_core::types::pagination::{PageRequest, PageResponse};
use blockshare_database::FileRequestRepository;
use blockshare_entity::request::{ActionType, FileRequestDetails, UpsertFileRequest};

use crate::file::FileService;

/// A user's request body.
#[derive(Debug, Clone)]
pub struct CreateFileRequest {
    /// Free-text justification. Must not be blank.
    pub reason: String,
    /// Requested action.
    pub action_type: ActionType,
}

/// Handles requests users raise against other users' files.
#[derive(Clone)]
pub struct FileRequestService {
    requests: Arc<dyn FileRequestRepository>,
    files: Arc<FileService>,
}

impl FileRequestService {
    /// Creates a new request service.
    pub fn new(requests: Arc<dyn FileRequestRepository>, files: Arc<FileService>) -> Self {
        Self { requests, files }
    }

    /// Creates the author's request on a file, or overwrites the one they
    /// already have on it.
    pub async fn create(
        &self,
        file_id: Uuid,
        data: CreateFileRequest,
        user_id: Uuid,
    ) -> AppResult<FileRequestDetails> {
        if data.reason.trim().is_empty() {
            return Err(AppError::validation("Reason cannot be empty"));
        }

        let file = self.files.get_by_id(file_id).await?;

        let request = self
            .requests
            .upsert(&UpsertFileRequest {
                reason: data.reason,
                action_type: data.action_type,
                user_id,
                file_id: file.id,
            })
            .await?;

        info!(
            request_id = request.id,
            file_id = %file.id,
            user_id = %user_id,
            action_type = %request.action_type,
            "File request saved"
        );

        self.requests
            .find_details(request.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Request {} not found", request.id)))
    }

    /// Lists requests, most recently updated first. A nil or absent
    /// `user_id` lists every author's requests.
    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<FileRequestDetails>> {
        let user_id = user_id.filter(|id| !id.is_nil());
        self.requests.find_page(user_id, page).await
    }

    /// Deletes a request. Only the owner of the targeted file may reject;
    /// who authored the request does not matter.
    pub async fn reject(&self, request_id: i64, actor_id: Uuid) -> AppResult<()> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Request {request_id} not found")))?;

        let file = self.files.get_by_id(request.file_id).await?;
        require_owner(file.owner_id, actor_id, &format!("request {request_id}"))?;

        if !self.requests.delete(request_id).await? {
            return Err(AppError::not_found(format!("Request {request_id} not found")));
        }

        info!(request_id, file_id = %file.id, owner_id = %actor_id, "File request rejected");
        Ok(())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use blockshare_core::error::AppError;
use blockshare_core::result::AppResult;
use blockshare_core::types::pagination::{PageRequest, PageResponse};
use blockshare_entity::request::{FileRequest, FileRequestDetails, UpsertFileRequest};

use super::{Tables, paginate};
use crate::repositories::FileRequestRepository;

/// In-memory file request repository.
#[derive(Debug, Clone)]
pub struct MemoryFileRequestRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryFileRequestRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

fn details(tables: &Tables, request: &FileRequest) -> Option<FileRequestDetails> {
    let user = tables.users.get(&request.user_id)?;
    let file = tables.files.get(&request.file_id)?;
    Some(FileRequestDetails {
        request: request.clone(),
        user: user.clone(),
        file: file.file.clone(),
    })
}

#[async_trait]
impl FileRequestRepository for MemoryFileRequestRepository {
    async fn upsert(&self, data: &UpsertFileRequest) -> AppResult<FileRequest> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.user_id) || !tables.files.contains_key(&data.file_id) {
            return Err(AppError::database(
                "Failed to upsert file request: referenced user or file does not exist",
            ));
        }

        let now = Utc::now();
        let existing = tables
            .requests
            .values_mut()
            .find(|r| r.user_id == data.user_id && r.file_id == data.file_id);

        if let Some(request) = existing {
            request.reason = data.reason.clone();
            request.action_type = data.action_type;
            request.updated_at = now;
            return Ok(request.clone());
        }

        tables.next_request_id += 1;
        let request = FileRequest {
            id: tables.next_request_id,
            reason: data.reason.clone(),
            action_type: data.action_type,
            user_id: data.user_id,
            file_id: data.file_id,
            created_at: now,
            updated_at: now,
        };
        tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<FileRequest>> {
        Ok(self.tables.read().await.requests.get(&id).cloned())
    }

    async fn find_details(&self, id: i64) -> AppResult<Option<FileRequestDetails>> {
        let tables = self.tables.read().await;
        Ok(tables.requests.get(&id).and_then(|r| details(&tables, r)))
    }

    async fn find_page(
        &self,
        user_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<FileRequestDetails>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<FileRequestDetails> = tables
            .requests
            .values()
            .filter(|r| user_id.is_none_or(|author| r.user_id == author))
            .filter_map(|r| details(&tables, r))
            .collect();
        rows.sort_by(|a, b| {
            b.request
                .updated_at
                .cmp(&a.request.updated_at)
                .then_with(|| b.request.id.cmp(&a.request.id))
        });

        let total = rows.len() as u64;
        let data = paginate(rows, page.offset(), page.limit());
        Ok(PageResponse::new(data, page, total))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.requests.remove(&id).is_some())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blockshare_core::error::AppError;
use blockshare_core::result::AppResult;
use blockshare_core::types::pagination::{PageRequest, PageResponse};
use blockshare_entity::file::{CreateFile, File, FileContent, FileStatus};
use blockshare_entity::user::User;

use super::{StoredFile, Tables, paginate};
use crate::repositories::FileRepository;

/// In-memory file repository.
#[derive(Debug, Clone)]
pub struct MemoryFileRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryFileRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

/// Remove a file and every request that targets it.
fn remove_file(tables: &mut Tables, id: Uuid) -> bool {
    if tables.files.remove(&id).is_none() {
        return false;
    }
    tables.requests.retain(|_, r| r.file_id != id);
    true
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.owner_id) {
            return Err(AppError::database(format!(
                "Failed to create file: owner {} does not exist",
                data.owner_id
            )));
        }
        if tables
            .files
            .values()
            .any(|f| f.file.download_token == data.download_token)
        {
            return Err(AppError::conflict(
                "Failed to create file: unique constraint violated",
            ));
        }

        let now = Utc::now();
        let file = File {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            size_bytes: data.size_bytes,
            mime_type: data.mime_type.clone(),
            download_token: data.download_token.clone(),
            status: FileStatus::Open,
            downloaded_at: now,
            download_count: 0,
            owner_id: data.owner_id,
            created_at: now,
        };
        tables.files.insert(
            file.id,
            StoredFile {
                file: file.clone(),
                data: data.data.clone(),
            },
        );
        Ok(file)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self
            .tables
            .read()
            .await
            .files
            .get(&id)
            .map(|s| s.file.clone()))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<File>> {
        Ok(self
            .tables
            .read()
            .await
            .files
            .values()
            .find(|s| s.file.download_token == token)
            .map(|s| s.file.clone()))
    }

    async fn find_content_by_token(&self, token: &str) -> AppResult<Option<FileContent>> {
        Ok(self
            .tables
            .read()
            .await
            .files
            .values()
            .find(|s| s.file.download_token == token)
            .map(|s| FileContent {
                file: s.file.clone(),
                data: s.data.clone(),
            }))
    }

    async fn find_page(
        &self,
        owner_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<File>> {
        let tables = self.tables.read().await;
        let mut files: Vec<File> = tables
            .files
            .values()
            .filter(|s| owner_id.is_none_or(|owner| s.file.owner_id == owner))
            .map(|s| s.file.clone())
            .collect();
        files.sort_by(|a, b| {
            b.downloaded_at
                .cmp(&a.downloaded_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = files.len() as u64;
        let data = paginate(files, page.offset(), page.limit());
        Ok(PageResponse::new(data, page, total))
    }

    async fn update_status(&self, id: Uuid, status: FileStatus) -> AppResult<Option<File>> {
        let mut tables = self.tables.write().await;
        Ok(tables.files.get_mut(&id).map(|s| {
            s.file.status = status;
            s.file.clone()
        }))
    }

    async fn record_download(&self, id: Uuid) -> AppResult<Option<File>> {
        let mut tables = self.tables.write().await;
        Ok(tables.files.get_mut(&id).map(|s| {
            s.file.download_count += 1;
            s.file.downloaded_at = Utc::now();
            s.file.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove_file(&mut tables, id))
    }

    async fn delete_downloaded_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let stale: Vec<Uuid> = tables
            .files
            .values()
            .filter(|s| s.file.downloaded_at < cutoff)
            .map(|s| s.file.id)
            .collect();

        let mut removed = 0;
        for id in stale {
            if remove_file(&mut tables, id) {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn find_owners(&self, owner_ids: &[Uuid]) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| owner_ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

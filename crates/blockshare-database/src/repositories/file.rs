//! PostgreSQL file repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use blockshare_core::result::AppResult;
use blockshare_core::types::pagination::{PageRequest, PageResponse};
use blockshare_entity::file::{CreateFile, File, FileContent, FileStatus};
use blockshare_entity::user::User;

use super::{FileRepository, map_sqlx_error};

/// Every column except the payload.
const FILE_COLUMNS: &str = "id, name, size_bytes, mime_type, download_token, status, \
                            downloaded_at, download_count, owner_id, created_at";

/// File repository backed by PostgreSQL. Payloads live in `files.data`.
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(&format!(
            "INSERT INTO files (id, name, size_bytes, mime_type, download_token, owner_id, data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {FILE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(data.size_bytes)
        .bind(&data.mime_type)
        .bind(&data.download_token)
        .bind(data.owner_id)
        .bind(&data.data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to create file"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(&format!("SELECT {FILE_COLUMNS} FROM files WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find file"))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE download_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to find file by token"))
    }

    async fn find_content_by_token(&self, token: &str) -> AppResult<Option<FileContent>> {
        sqlx::query_as::<_, FileContent>(&format!(
            "SELECT {FILE_COLUMNS}, data FROM files WHERE download_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to load file content"))
    }

    async fn find_page(
        &self,
        owner_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<File>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM files WHERE ($1::uuid IS NULL OR owner_id = $1)",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to count files"))?;

        let files = sqlx::query_as::<_, File>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE ($1::uuid IS NULL OR owner_id = $1) \
             ORDER BY downloaded_at DESC, id ASC LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to list files"))?;

        Ok(PageResponse::new(files, page, total as u64))
    }

    async fn update_status(&self, id: Uuid, status: FileStatus) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(&format!(
            "UPDATE files SET status = $2 WHERE id = $1 RETURNING {FILE_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to update file status"))
    }

    async fn record_download(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(&format!(
            "UPDATE files SET download_count = download_count + 1, downloaded_at = NOW() \
             WHERE id = $1 RETURNING {FILE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to record download"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to delete file"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_downloaded_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM files WHERE downloaded_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to purge files"))?;
        Ok(result.rows_affected())
    }

    async fn find_owners(&self, owner_ids: &[Uuid]) -> AppResult<Vec<User>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(owner_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to load file owners"))
    }
}

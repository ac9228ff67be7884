//! PostgreSQL file request repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use blockshare_core::result::AppResult;
use blockshare_core::types::pagination::{PageRequest, PageResponse};
use blockshare_entity::file::{File, FileStatus};
use blockshare_entity::request::{FileRequest, FileRequestDetails, UpsertFileRequest};
use blockshare_entity::user::User;

use super::{FileRequestRepository, map_sqlx_error};

/// Join of a request with its author and target file.
const DETAILS_SELECT: &str = "SELECT r.id, r.reason, r.action_type, r.user_id, r.file_id, \
     r.created_at, r.updated_at, \
     u.email AS user_email, u.name AS user_name, u.created_at AS user_created_at, \
     f.name AS file_name, f.size_bytes AS file_size_bytes, f.mime_type AS file_mime_type, \
     f.download_token AS file_download_token, f.status AS file_status, \
     f.downloaded_at AS file_downloaded_at, f.download_count AS file_download_count, \
     f.owner_id AS file_owner_id, f.created_at AS file_created_at \
     FROM file_requests r \
     JOIN users u ON u.id = r.user_id \
     JOIN files f ON f.id = r.file_id";

#[derive(Debug, FromRow)]
struct DetailsRow {
    #[sqlx(flatten)]
    request: FileRequest,
    user_email: String,
    user_name: String,
    user_created_at: DateTime<Utc>,
    file_name: String,
    file_size_bytes: i64,
    file_mime_type: String,
    file_download_token: String,
    file_status: FileStatus,
    file_downloaded_at: DateTime<Utc>,
    file_download_count: i64,
    file_owner_id: Uuid,
    file_created_at: DateTime<Utc>,
}

impl From<DetailsRow> for FileRequestDetails {
    fn from(row: DetailsRow) -> Self {
        let user = User {
            id: row.request.user_id,
            email: row.user_email,
            name: row.user_name,
            created_at: row.user_created_at,
        };
        let file = File {
            id: row.request.file_id,
            name: row.file_name,
            size_bytes: row.file_size_bytes,
            mime_type: row.file_mime_type,
            download_token: row.file_download_token,
            status: row.file_status,
            downloaded_at: row.file_downloaded_at,
            download_count: row.file_download_count,
            owner_id: row.file_owner_id,
            created_at: row.file_created_at,
        };
        Self {
            request: row.request,
            user,
            file,
        }
    }
}

/// File request repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgFileRequestRepository {
    pool: PgPool,
}

impl PgFileRequestRepository {
    /// Create a new file request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRequestRepository for PgFileRequestRepository {
    async fn upsert(&self, data: &UpsertFileRequest) -> AppResult<FileRequest> {
        sqlx::query_as::<_, FileRequest>(
            "INSERT INTO file_requests (reason, action_type, user_id, file_id) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, file_id) DO UPDATE SET \
             reason = EXCLUDED.reason, action_type = EXCLUDED.action_type, updated_at = NOW() \
             RETURNING *",
        )
        .bind(&data.reason)
        .bind(data.action_type)
        .bind(data.user_id)
        .bind(data.file_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to upsert file request"))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<FileRequest>> {
        sqlx::query_as::<_, FileRequest>("SELECT * FROM file_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find file request"))
    }

    async fn find_details(&self, id: i64) -> AppResult<Option<FileRequestDetails>> {
        let row = sqlx::query_as::<_, DetailsRow>(&format!("{DETAILS_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to load file request"))?;
        Ok(row.map(FileRequestDetails::from))
    }

    async fn find_page(
        &self,
        user_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<FileRequestDetails>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM file_requests WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to count file requests"))?;

        let rows = sqlx::query_as::<_, DetailsRow>(&format!(
            "{DETAILS_SELECT} WHERE ($1::uuid IS NULL OR r.user_id = $1) \
             ORDER BY r.updated_at DESC, r.id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to list file requests"))?;

        let data = rows.into_iter().map(FileRequestDetails::from).collect();
        Ok(PageResponse::new(data, page, total as u64))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM file_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to delete file request"))?;
        Ok(result.rows_affected() > 0)
    }
}

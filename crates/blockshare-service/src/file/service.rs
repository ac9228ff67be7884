//! File service.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use blockshare_auth::require_owner;
use blockshare_core::error::{AppError, ErrorKind};
use blockshare_core::events::FileEvent;
use blockshare_core::result::AppResult;
use blockshare_core::types::pagination::{PageRequest, PageResponse};
use blockshare_database::FileRepository;
use blockshare_entity::file::{CreateFile, File, FileContent, FileStatus, FileWithOwner};

use crate::events::FileEventPublisher;
use crate::token::TokenGenerator;

/// Upload metadata reported by the transport layer.
#[derive(Debug, Clone)]
pub struct FileMeta {
    /// Payload size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
}

/// Owner-initiated changes to a file.
#[derive(Debug, Clone, Copy)]
pub struct UpdateFile {
    /// New status.
    pub status: FileStatus,
}

/// Handles the file lifecycle.
#[derive(Clone)]
pub struct FileService {
    files: Arc<dyn FileRepository>,
    tokens: Arc<dyn TokenGenerator>,
    events: FileEventPublisher,
    max_token_attempts: u32,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileRepository>,
        tokens: Arc<dyn TokenGenerator>,
        events: FileEventPublisher,
        max_token_attempts: u32,
    ) -> Self {
        Self {
            files,
            tokens,
            events,
            max_token_attempts: max_token_attempts.max(1),
        }
    }

    /// Stores an uploaded file under a fresh download token.
    ///
    /// A candidate token is discarded when a file already holds it or when
    /// the insert hits the unique index. After `max_token_attempts`
    /// candidates the upload fails with `TokenExhausted`.
    pub async fn upload(
        &self,
        data: Bytes,
        name: &str,
        meta: FileMeta,
        owner_id: Uuid,
    ) -> AppResult<File> {
        if name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }

        let mut record = CreateFile {
            name: name.to_string(),
            size_bytes: meta.size_bytes,
            mime_type: meta.mime_type,
            download_token: String::new(),
            owner_id,
            data: data.to_vec(),
        };

        for attempt in 1..=self.max_token_attempts {
            record.download_token = self.tokens.generate();

            if self.files.find_by_token(&record.download_token).await?.is_some() {
                debug!(attempt, "Download token already taken");
                continue;
            }

            match self.files.create(&record).await {
                Ok(file) => {
                    info!(
                        file_id = %file.id,
                        owner_id = %owner_id,
                        size_bytes = file.size_bytes,
                        "File uploaded"
                    );
                    return Ok(file);
                }
                Err(e) if e.is(ErrorKind::Conflict) => {
                    debug!(attempt, "Download token claimed concurrently");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.max_token_attempts,
            owner_id = %owner_id,
            "Gave up generating a unique download token"
        );
        Err(AppError::token_exhausted("token space exhausted"))
    }

    /// Lists files, most recently downloaded first.
    ///
    /// Without an owner filter (or with the nil UUID) every file is
    /// returned with its owner loaded. With a filter only that owner's
    /// files are returned and the owner is not loaded.
    pub async fn list(
        &self,
        owner_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<FileWithOwner>> {
        let owner_id = owner_id.filter(|id| !id.is_nil());

        let files = self.files.find_page(owner_id, page).await?;
        if owner_id.is_some() {
            return Ok(files.map(|file| FileWithOwner { file, owner: None }));
        }

        let mut owner_ids: Vec<Uuid> = files.data.iter().map(|f| f.owner_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<Uuid, _> = self
            .files
            .find_owners(&owner_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(files.map(|file| {
            let owner = owners.get(&file.owner_id).cloned();
            FileWithOwner { file, owner }
        }))
    }

    /// Gets a file by id.
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<File> {
        self.files
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// Applies an owner's update.
    ///
    /// When `request_id` is given, the update answers that request and a
    /// [`FileEvent::Updated`] is published so the request gets removed.
    pub async fn update(
        &self,
        id: Uuid,
        update: UpdateFile,
        actor_id: Uuid,
        request_id: Option<i64>,
    ) -> AppResult<File> {
        let file = self.get_by_id(id).await?;
        require_owner(file.owner_id, actor_id, &format!("file {id}"))?;

        let updated = self
            .files
            .update_status(id, update.status)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;

        info!(file_id = %id, status = %updated.status, "File status updated");

        if let Some(request_id) = request_id {
            self.events.publish(FileEvent::Updated {
                file_id: id,
                owner_id: actor_id,
                request_id,
            });
        }

        Ok(updated)
    }

    /// Deletes a file owned by `actor_id`. Its requests go with it.
    pub async fn delete(&self, id: Uuid, actor_id: Uuid) -> AppResult<()> {
        let file = self.get_by_id(id).await?;
        require_owner(file.owner_id, actor_id, &format!("file {id}"))?;

        if !self.files.delete(id).await? {
            return Err(AppError::not_found(format!("File {id} not found")));
        }

        info!(file_id = %id, owner_id = %actor_id, "File deleted");
        Ok(())
    }

    /// Resolves a download token to the file and its payload, recording the
    /// download. Holding the token is the only credential required.
    pub async fn resolve_by_token(&self, token: &str) -> AppResult<FileContent> {
        let mut content = self
            .files
            .find_content_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        content.file = self
            .files
            .record_download(content.file.id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        debug!(
            file_id = %content.file.id,
            download_count = content.file.download_count,
            "File downloaded"
        );
        Ok(content)
    }

    /// Deletes every file not downloaded within the last `days` days.
    pub async fn purge_older_than(&self, days: u32) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let removed = self.files.delete_downloaded_before(cutoff).await?;
        info!(removed, days, %cutoff, "Purged stale files");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTokens, TestContext};

    fn meta() -> FileMeta {
        FileMeta {
            size_bytes: 5,
            mime_type: "text/plain".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upload_sets_defaults() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;

        let file = ctx.upload(owner, "notes.txt").await;
        assert_eq!(file.status, FileStatus::Open);
        assert_eq!(file.download_count, 0);
        assert_eq!(file.download_token.len(), 100);
        assert_eq!(file.owner_id, owner);
    }

    #[tokio::test]
    async fn test_upload_retries_after_collision() {
        let tokens = ScriptedTokens::new(["dup", "dup", "fresh"]);
        let ctx = TestContext::with_tokens(tokens, 16).await;
        let owner = ctx.user("owner@example.com").await;

        let first = ctx
            .services
            .files
            .upload(Bytes::from_static(b"hello"), "a.txt", meta(), owner)
            .await
            .unwrap();
        let second = ctx
            .services
            .files
            .upload(Bytes::from_static(b"hello"), "b.txt", meta(), owner)
            .await
            .unwrap();

        assert_eq!(first.download_token, "dup");
        assert_eq!(second.download_token, "fresh");
    }

    #[tokio::test]
    async fn test_upload_gives_up_after_budget() {
        let tokens = ScriptedTokens::new(["dup", "dup", "dup", "dup"]);
        let ctx = TestContext::with_tokens(tokens, 3).await;
        let owner = ctx.user("owner@example.com").await;

        ctx.services
            .files
            .upload(Bytes::from_static(b"x"), "a.txt", meta(), owner)
            .await
            .unwrap();
        let err = ctx
            .services
            .files
            .upload(Bytes::from_static(b"x"), "b.txt", meta(), owner)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::TokenExhausted);
        assert_eq!(err.message, "token space exhausted");
    }

    #[tokio::test]
    async fn test_upload_rejects_blank_name() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let err = ctx
            .services
            .files
            .upload(Bytes::from_static(b"x"), "  ", meta(), owner)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_list_all_loads_owner_filtered_does_not() {
        let ctx = TestContext::new().await;
        let alice = ctx.user("alice@example.com").await;
        let bob = ctx.user("bob@example.com").await;
        ctx.upload(alice, "a.txt").await;
        ctx.upload(bob, "b.txt").await;

        let all = ctx
            .services
            .files
            .list(None, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total_count, 2);
        assert!(all.data.iter().all(|f| f.owner.is_some()));

        let nil = ctx
            .services
            .files
            .list(Some(Uuid::nil()), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(nil.total_count, 2);

        let mine = ctx
            .services
            .files
            .list(Some(alice), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(mine.total_count, 1);
        assert_eq!(mine.data[0].file.owner_id, alice);
        assert!(mine.data[0].owner.is_none());
    }

    #[tokio::test]
    async fn test_list_pages_are_one_indexed() {
        let ctx = TestContext::new().await;
        let alice = ctx.user("alice@example.com").await;
        for i in 0..3 {
            ctx.upload(alice, &format!("{i}.txt")).await;
        }

        let second = ctx
            .services
            .files
            .list(Some(alice), &PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(second.total_count, 3);
        assert_eq!(second.data.len(), 1);
        assert_eq!(second.page, 2);
    }

    #[tokio::test]
    async fn test_get_missing_file_is_not_found() {
        let ctx = TestContext::new().await;
        let err = ctx
            .services
            .files
            .get_by_id(Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_non_owner_update_leaves_row_untouched() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let other = ctx.user("other@example.com").await;
        let file = ctx.upload(owner, "a.txt").await;

        let err = ctx
            .services
            .files
            .update(
                file.id,
                UpdateFile {
                    status: FileStatus::Blocked,
                },
                other,
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let reloaded = ctx.services.files.get_by_id(file.id).await.unwrap();
        assert_eq!(reloaded.status, FileStatus::Open);
    }

    #[tokio::test]
    async fn test_non_owner_delete_leaves_row_untouched() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let other = ctx.user("other@example.com").await;
        let file = ctx.upload(owner, "a.txt").await;

        let err = ctx
            .services
            .files
            .delete(file.id, other)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(ctx.services.files.get_by_id(file.id).await.is_ok());

        ctx.services.files.delete(file.id, owner).await.unwrap();
        let err = ctx
            .services
            .files
            .delete(file.id, owner)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_two_downloads_increment_count_by_two() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let file = ctx.upload(owner, "a.txt").await;

        ctx.services
            .files
            .resolve_by_token(&file.download_token)
            .await
            .unwrap();
        let content = ctx
            .services
            .files
            .resolve_by_token(&file.download_token)
            .await
            .unwrap();

        assert_eq!(content.file.download_count, 2);
        assert_eq!(content.data, b"hello".to_vec());
        assert!(content.file.downloaded_at >= file.downloaded_at);
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let ctx = TestContext::new().await;
        let err = ctx
            .services
            .files
            .resolve_by_token("nope")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_purge_removes_only_stale_files() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let stale = ctx.upload(owner, "old.txt").await;
        let fresh = ctx.upload(owner, "new.txt").await;
        let recent = ctx.upload(owner, "recent.txt").await;

        ctx.db
            .set_downloaded_at(stale.id, Utc::now() - Duration::days(15))
            .await;
        ctx.db
            .set_downloaded_at(recent.id, Utc::now() - Duration::days(13))
            .await;

        let removed = ctx.services.files.purge_older_than(14).await.unwrap();
        assert_eq!(removed, 1);
        assert!(ctx.services.files.get_by_id(stale.id).await.is_err());
        assert!(ctx.services.files.get_by_id(fresh.id).await.is_ok());
        assert!(ctx.services.files.get_by_id(recent.id).await.is_ok());
    }
}

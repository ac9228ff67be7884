//! Listener rejecting the answered request after an owner update.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use blockshare_core::events::FileEvent;
use blockshare_core::result::AppResult;

use super::publisher::FileEventReceiver;
use crate::request::FileRequestService;

/// Consumes [`FileEvent`]s and deletes the request each update answered.
#[derive(Clone)]
pub struct FileUpdatedListener {
    requests: Arc<FileRequestService>,
}

impl FileUpdatedListener {
    /// Creates a new listener.
    pub fn new(requests: Arc<FileRequestService>) -> Self {
        Self { requests }
    }

    /// Handle a single event.
    pub async fn handle(&self, event: FileEvent) -> AppResult<()> {
        match event {
            FileEvent::Updated {
                file_id,
                owner_id,
                request_id,
            } => {
                self.requests.reject(request_id, owner_id).await?;
                info!(%file_id, request_id, "Request resolved by file update");
                Ok(())
            }
        }
    }

    /// Drain events until the channel closes or shutdown is signalled.
    ///
    /// Failures are logged and dropped.
    pub async fn run(self, mut events: FileEventReceiver, mut shutdown: watch::Receiver<bool>) {
        info!("File event listener started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("File event listener received shutdown signal");
                        break;
                    }
                }
                received = events.recv() => {
                    let Some(event) = received else {
                        break;
                    };
                    if let Err(e) = self.handle(event.clone()).await {
                        warn!(?event, error = %e, "Failed to handle file event");
                    }
                }
            }
        }

        info!("File event listener stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;
    use blockshare_entity::file::FileStatus;
    use blockshare_entity::request::ActionType;
    use crate::file::UpdateFile;
    use crate::request::CreateFileRequest;

    #[tokio::test]
    async fn test_update_with_request_id_deletes_request() {
        let mut ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let requester = ctx.user("requester@example.com").await;
        let file = ctx.upload(owner, "doc.pdf").await;

        let request = ctx
            .services
            .requests
            .create(
                file.id,
                CreateFileRequest {
                    reason: "copyright".to_string(),
                    action_type: ActionType::Block,
                },
                requester,
            )
            .await
            .unwrap();

        let updated = ctx
            .services
            .files
            .update(
                file.id,
                UpdateFile {
                    status: FileStatus::Blocked,
                },
                owner,
                Some(request.request.id),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, FileStatus::Blocked);

        let event = ctx.events.recv().await.unwrap();
        assert_eq!(
            event,
            FileEvent::Updated {
                file_id: file.id,
                owner_id: owner,
                request_id: request.request.id,
            }
        );

        let listener = FileUpdatedListener::new(ctx.services.requests.clone());
        listener.handle(event).await.unwrap();

        let remaining = ctx
            .services
            .requests
            .list(None, &Default::default())
            .await
            .unwrap();
        assert_eq!(remaining.total_count, 0);
    }

    #[tokio::test]
    async fn test_update_without_request_id_publishes_nothing() {
        let mut ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let file = ctx.upload(owner, "doc.pdf").await;

        ctx.services
            .files
            .update(
                file.id,
                UpdateFile {
                    status: FileStatus::Blocked,
                },
                owner,
                None,
            )
            .await
            .unwrap();

        assert!(ctx.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_handle_unknown_request_fails_without_side_effects() {
        let ctx = TestContext::new().await;
        let listener = FileUpdatedListener::new(ctx.services.requests.clone());

        let err = listener
            .handle(FileEvent::Updated {
                file_id: uuid::Uuid::new_v4(),
                owner_id: uuid::Uuid::new_v4(),
                request_id: 99,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, blockshare_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let ctx = TestContext::new().await;
        let listener = FileUpdatedListener::new(ctx.services.requests.clone());
        let (_publisher, rx) = crate::events::file_event_channel();
        let (tx, shutdown) = watch::channel(false);

        let handle = tokio::spawn(listener.run(rx, shutdown));
        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}

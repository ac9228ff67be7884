//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use blockshare_core::error::AppError;

use crate::jobs::PurgeJobHandler;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Purge job handler
    purge: Arc<PurgeJobHandler>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(purge: PurgeJobHandler) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            purge: Arc::new(purge),
        })
    }

    /// Register all scheduled tasks
    pub async fn register_default_tasks(&self, purge_cron: &str) -> Result<(), AppError> {
        self.register_file_purge(purge_cron).await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// File purge, daily at midnight by default
    async fn register_file_purge(&self, cron: &str) -> Result<(), AppError> {
        let purge = Arc::clone(&self.purge);
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let purge = Arc::clone(&purge);
            Box::pin(async move {
                match purge.execute().await {
                    Ok(removed) => tracing::info!(removed, "file_purge finished"),
                    Err(e) => tracing::error!(error = %e, "file_purge failed"),
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create file_purge schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add file_purge schedule: {e}")))?;

        tracing::info!(
            cron,
            retention_days = self.purge.retention_days(),
            "Registered: file_purge"
        );
        Ok(())
    }
}

//! Stale file purge.

use std::sync::Arc;

use blockshare_core::error::ErrorKind;
use blockshare_service::FileService;

use super::JobExecutionError;

/// Deletes files whose last download is older than the retention window.
#[derive(Clone)]
pub struct PurgeJobHandler {
    files: Arc<FileService>,
    retention_days: u32,
}

impl PurgeJobHandler {
    /// Create a new purge handler
    pub fn new(files: Arc<FileService>, retention_days: u32) -> Self {
        Self {
            files,
            retention_days,
        }
    }

    /// Retention window in days
    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    /// Run one purge pass, returning the number of files removed
    pub async fn execute(&self) -> Result<u64, JobExecutionError> {
        tracing::info!(retention_days = self.retention_days, "Running file purge");

        self.files
            .purge_older_than(self.retention_days)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::Database => JobExecutionError::Transient(e.to_string()),
                _ => JobExecutionError::Internal(e),
            })
    }
}

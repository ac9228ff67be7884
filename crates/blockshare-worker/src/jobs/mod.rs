//! Job handlers run by the scheduler.

pub mod purge;

pub use purge::PurgeJobHandler;

use blockshare_core::error::AppError;

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Transient failure; the next scheduled run may succeed
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

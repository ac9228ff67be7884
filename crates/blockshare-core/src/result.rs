//! Convenience result type alias for BlockShare.

use crate::error::AppError;

/// A specialized `Result` type for BlockShare operations.
pub type AppResult<T> = Result<T, AppError>;

//! File-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to file operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FileEvent {
    /// An owner changed a file's status in answer to a pending request.
    Updated {
        /// The file ID.
        file_id: Uuid,
        /// The owner who performed the update.
        owner_id: Uuid,
        /// The request the update answers.
        request_id: i64,
    },
}

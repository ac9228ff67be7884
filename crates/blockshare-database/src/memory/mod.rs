//! In-memory repository implementations.
//!
//! All repositories created from one [`MemoryDatabase`] share the same
//! tables, so they observe each other's writes exactly as the PostgreSQL
//! repositories do. The unique download token, the `(user_id, file_id)`
//! request key, foreign keys, and the file → request cascade are enforced
//! here the same way the schema enforces them.

mod file;
mod request;
mod user;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blockshare_entity::file::File;
use blockshare_entity::request::FileRequest;
use blockshare_entity::user::User;

pub use file::MemoryFileRepository;
pub use request::MemoryFileRequestRepository;
pub use user::MemoryUserRepository;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: HashMap<Uuid, User>,
    pub files: HashMap<Uuid, StoredFile>,
    pub requests: BTreeMap<i64, FileRequest>,
    pub next_request_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct StoredFile {
    pub file: File,
    pub data: Vec<u8>,
}

/// Shared in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// User repository over these tables.
    pub fn users(&self) -> MemoryUserRepository {
        MemoryUserRepository::new(self.tables.clone())
    }

    /// File repository over these tables.
    pub fn files(&self) -> MemoryFileRepository {
        MemoryFileRepository::new(self.tables.clone())
    }

    /// File request repository over these tables.
    pub fn requests(&self) -> MemoryFileRequestRepository {
        MemoryFileRequestRepository::new(self.tables.clone())
    }

    /// Overwrite a file's last-download time. Returns `false` if the file
    /// does not exist.
    pub async fn set_downloaded_at(&self, file_id: Uuid, at: DateTime<Utc>) -> bool {
        let mut tables = self.tables.write().await;
        match tables.files.get_mut(&file_id) {
            Some(stored) => {
                stored.file.downloaded_at = at;
                true
            }
            None => false,
        }
    }
}

/// Slice a sorted vector into the requested page.
pub(crate) fn paginate<T>(items: Vec<T>, offset: u64, limit: u64) -> Vec<T> {
    items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect()
}

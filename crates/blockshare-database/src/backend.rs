//! Backend selection and repository bundle.

use std::sync::Arc;

use tracing::info;

use blockshare_core::config::DatabaseConfig;
use blockshare_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryDatabase;
use crate::migration::run_migrations;
use crate::repositories::{
    FileRepository, FileRequestRepository, PgFileRepository, PgFileRequestRepository,
    PgUserRepository, UserRepository,
};

/// The storage backend selected by `database.url`.
#[derive(Debug, Clone)]
pub enum Database {
    /// PostgreSQL through a sqlx pool.
    Postgres(DatabasePool),
    /// Process-local tables, lost on exit.
    Memory(MemoryDatabase),
}

impl Database {
    /// Open the configured backend, running migrations for PostgreSQL when
    /// `database.run_migrations` is set.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            info!("Using in-memory database backend");
            return Ok(Self::Memory(MemoryDatabase::new()));
        }

        let pool = DatabasePool::connect(config).await?;
        if config.run_migrations {
            run_migrations(pool.pool()).await?;
        }
        Ok(Self::Postgres(pool))
    }

    /// Build the repositories for this backend.
    pub fn repositories(&self) -> Repositories {
        match self {
            Self::Postgres(pool) => {
                let pool = pool.pool().clone();
                Repositories {
                    users: Arc::new(PgUserRepository::new(pool.clone())),
                    files: Arc::new(PgFileRepository::new(pool.clone())),
                    requests: Arc::new(PgFileRequestRepository::new(pool)),
                }
            }
            Self::Memory(db) => Repositories {
                users: Arc::new(db.users()),
                files: Arc::new(db.files()),
                requests: Arc::new(db.requests()),
            },
        }
    }

    /// Check connectivity. The in-memory backend is always healthy.
    pub async fn health_check(&self) -> AppResult<bool> {
        match self {
            Self::Postgres(pool) => pool.health_check().await,
            Self::Memory(_) => Ok(true),
        }
    }

    /// Short backend name for health output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Self::Postgres(pool) = self {
            pool.close().await;
        }
    }
}

/// All repositories, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    /// User repository.
    pub users: Arc<dyn UserRepository>,
    /// File repository.
    pub files: Arc<dyn FileRepository>,
    /// File request repository.
    pub requests: Arc<dyn FileRequestRepository>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockshare_core::config::database::MEMORY_URL;

    #[tokio::test]
    async fn test_memory_url_selects_memory_backend() {
        let config = DatabaseConfig {
            url: MEMORY_URL.to_string(),
            ..DatabaseConfig::default()
        };
        let db = Database::connect(&config).await.unwrap();
        assert_eq!(db.kind(), "memory");
        assert!(db.health_check().await.unwrap());
    }
}

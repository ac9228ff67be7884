//! Shared fixtures for service tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use uuid::Uuid;

use blockshare_core::config::FilesConfig;
use blockshare_database::{Database, MemoryDatabase};
use blockshare_entity::file::File;

use crate::container::ServiceContainer;
use crate::events::FileEventReceiver;
use crate::file::FileMeta;
use crate::token::TokenGenerator;

/// Hands out a fixed sequence of tokens, then repeats the last one.
pub struct ScriptedTokens {
    queue: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedTokens {
    pub fn new<const N: usize>(tokens: [&str; N]) -> Self {
        Self {
            queue: Mutex::new(tokens.iter().map(|t| t.to_string()).collect()),
            last: Mutex::new(String::new()),
        }
    }
}

impl TokenGenerator for ScriptedTokens {
    fn generate(&self) -> String {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.queue.lock().unwrap().pop_front() {
            *last = next;
        }
        last.clone()
    }
}

pub struct TestContext {
    pub db: MemoryDatabase,
    pub services: ServiceContainer,
    pub events: FileEventReceiver,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = MemoryDatabase::new();
        let repos = Database::Memory(db.clone()).repositories();
        let (services, events) = ServiceContainer::new(repos, &FilesConfig::default());
        Self {
            db,
            services,
            events,
        }
    }

    pub async fn with_tokens(tokens: ScriptedTokens, max_attempts: u32) -> Self {
        let db = MemoryDatabase::new();
        let repos = Database::Memory(db.clone()).repositories();
        let (services, events) =
            ServiceContainer::with_token_generator(repos, Arc::new(tokens), max_attempts);
        Self {
            db,
            services,
            events,
        }
    }

    /// Provision a user and return its id.
    pub async fn user(&self, email: &str) -> Uuid {
        self.services
            .users
            .provision(Uuid::new_v4(), email, "Test User")
            .await
            .unwrap()
            .id
    }

    /// Upload a five-byte text file.
    pub async fn upload(&self, owner_id: Uuid, name: &str) -> File {
        self.services
            .files
            .upload(
                Bytes::from_static(b"hello"),
                name,
                FileMeta {
                    size_bytes: 5,
                    mime_type: "text/plain".to_string(),
                },
                owner_id,
            )
            .await
            .unwrap()
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use blockshare_core::error::AppError;
use blockshare_core::result::AppResult;
use blockshare_core::types::pagination::{PageRequest, PageResponse};
use blockshare_entity::user::{CreateUser, User};

use super::{Tables, paginate};
use crate::repositories::UserRepository;

/// In-memory user repository.
#[derive(Debug, Clone)]
pub struct MemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryUserRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn upsert(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;

        let email_taken = tables
            .users
            .values()
            .any(|u| u.id != data.id && u.email.eq_ignore_ascii_case(&data.email));
        if email_taken {
            return Err(AppError::conflict(format!(
                "Failed to upsert user: email '{}' already in use",
                data.email
            )));
        }

        let user = tables
            .users
            .entry(data.id)
            .and_modify(|u| {
                u.email = data.email.clone();
                u.name = data.name.clone();
            })
            .or_insert_with(|| User {
                id: data.id,
                email: data.email.clone(),
                name: data.name.clone(),
                created_at: Utc::now(),
            });
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));

        let total = users.len() as u64;
        let data = paginate(users, page.offset(), page.limit());
        Ok(PageResponse::new(data, page, total))
    }
}

//! User service.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use blockshare_core::error::AppError;
use blockshare_core::result::AppResult;
use blockshare_core::types::pagination::{PageRequest, PageResponse};
use blockshare_database::UserRepository;
use blockshare_entity::user::{CreateUser, User};

/// Keeps local user rows in step with the identity service.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Inserts or refreshes the user described by verified token claims.
    pub async fn provision(&self, user_id: Uuid, email: &str, name: &str) -> AppResult<User> {
        let user = self
            .users
            .upsert(&CreateUser {
                id: user_id,
                email: email.to_string(),
                name: name.to_string(),
            })
            .await?;
        debug!(user_id = %user.id, "User provisioned");
        Ok(user)
    }

    /// Lists users by email.
    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        self.users.find_all(page).await
    }

    /// Gets a user by email.
    pub async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {email} not found")))
    }
}

//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user known to BlockShare.
///
/// Rows are provisioned from verified token claims; the identity service
/// owns the canonical account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identifier issued by the identity service (`sub` claim).
    pub id: Uuid,
    /// Unique email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// When the user was first seen.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert or refresh a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Identifier from the token.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
}

//! Owner-only capability check.

use uuid::Uuid;

use blockshare_core::error::AppError;

/// Succeeds only when `actor_id` owns the resource.
///
/// `resource` names the thing being mutated and ends up in the error
/// message, e.g. `"file 3f2a…"`.
pub fn require_owner(owner_id: Uuid, actor_id: Uuid, resource: &str) -> Result<(), AppError> {
    if owner_id == actor_id {
        Ok(())
    } else {
        Err(AppError::authorization(format!(
            "User {actor_id} is not the owner of {resource}"
        )))
    }
}

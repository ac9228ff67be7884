//! Requested action enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The action a requester asks the file owner to take.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "action_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Ask the owner to block the file.
    #[default]
    Block,
    /// Ask the owner to unblock the file.
    Unblock,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Unblock => write!(f, "unblock"),
        }
    }
}

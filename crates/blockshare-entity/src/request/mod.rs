//! File request domain entities.

pub mod action;
pub mod model;

pub use action::ActionType;
pub use model::{FileRequest, FileRequestDetails, UpsertFileRequest};

//! File request lifecycle: create-or-update, list, and reject.

pub mod service;

pub use service::{CreateFileRequest, FileRequestService};

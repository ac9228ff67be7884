//! File upload, listing, ownership-gated mutation, token download, and purge.

pub mod service;

pub use service::{FileMeta, FileService, UpdateFile};

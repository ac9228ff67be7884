//! Core type definitions used across the BlockShare workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};

//! Route handlers organized by domain.

pub mod file;
pub mod health;
pub mod request;
pub mod user;

//! User provisioning and lookup.

pub mod service;

pub use service::UserService;

//! # blockshare-entity
//!
//! Domain entity models for BlockShare. Every struct in this crate
//! represents a database table row, an insert payload, or a joined view.
//! Row types derive `sqlx::FromRow`; enums map onto PostgreSQL enum types.

pub mod file;
pub mod request;
pub mod user;

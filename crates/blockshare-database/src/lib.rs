//! # blockshare-database
//!
//! Persistence access for BlockShare. Repository traits describe every
//! query the services need; each has a PostgreSQL implementation and an
//! in-memory one with the same semantics.

pub mod backend;
pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use backend::{Database, Repositories};
pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use repositories::{FileRepository, FileRequestRepository, UserRepository};

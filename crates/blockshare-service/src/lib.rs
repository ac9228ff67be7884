//! # blockshare-service
//!
//! Business logic service layer for BlockShare. Each service orchestrates
//! repositories and the ownership check to implement one use case family.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`ServiceContainer`] wires
//! the full graph for the binary and for tests.

pub mod container;
pub mod events;
pub mod file;
pub mod request;
pub mod token;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use container::ServiceContainer;
pub use events::{FileEventPublisher, FileEventReceiver, FileUpdatedListener, file_event_channel};
pub use file::{FileMeta, FileService, UpdateFile};
pub use request::{CreateFileRequest, FileRequestService};
pub use token::{AlphanumericTokenGenerator, TokenGenerator};
pub use user::UserService;

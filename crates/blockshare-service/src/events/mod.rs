//! In-process bridge carrying file events from the file service to the
//! request service.

pub mod listener;
pub mod publisher;

pub use listener::FileUpdatedListener;
pub use publisher::{FileEventPublisher, FileEventReceiver, file_event_channel};

//! Typed file event channel.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use blockshare_core::events::FileEvent;

/// Receiving half of the file event channel.
pub type FileEventReceiver = mpsc::UnboundedReceiver<FileEvent>;

/// Sending half of the file event channel.
#[derive(Debug, Clone)]
pub struct FileEventPublisher {
    tx: mpsc::UnboundedSender<FileEvent>,
}

/// Create a connected publisher / receiver pair.
pub fn file_event_channel() -> (FileEventPublisher, FileEventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FileEventPublisher { tx }, rx)
}

impl FileEventPublisher {
    /// Publish an event. Never fails: with no live receiver the event is
    /// dropped and a warning logged.
    pub fn publish(&self, event: FileEvent) {
        debug!(?event, "Publishing file event");
        if let Err(mpsc::error::SendError(event)) = self.tx.send(event) {
            warn!(?event, "No file event listener running; event dropped");
        }
    }
}

//! Service graph wiring.

use std::sync::Arc;

use blockshare_core::config::FilesConfig;
use blockshare_database::Repositories;

use crate::events::{FileEventReceiver, FileUpdatedListener, file_event_channel};
use crate::file::FileService;
use crate::request::FileRequestService;
use crate::token::{AlphanumericTokenGenerator, TokenGenerator};
use crate::user::UserService;

/// Every service, built over one set of repositories.
#[derive(Clone)]
pub struct ServiceContainer {
    /// File service.
    pub files: Arc<FileService>,
    /// File request service.
    pub requests: Arc<FileRequestService>,
    /// User service.
    pub users: Arc<UserService>,
}

impl ServiceContainer {
    /// Builds the services with random download tokens.
    ///
    /// Returns the receiving end of the file event channel; hand it to
    /// [`ServiceContainer::listener`]'s `run`.
    pub fn new(repos: Repositories, config: &FilesConfig) -> (Self, FileEventReceiver) {
        let tokens = Arc::new(AlphanumericTokenGenerator::new(config.token_length));
        Self::with_token_generator(repos, tokens, config.max_token_attempts)
    }

    /// Builds the services with a caller-supplied token generator.
    pub fn with_token_generator(
        repos: Repositories,
        tokens: Arc<dyn TokenGenerator>,
        max_token_attempts: u32,
    ) -> (Self, FileEventReceiver) {
        let (publisher, receiver) = file_event_channel();

        let files = Arc::new(FileService::new(
            repos.files,
            tokens,
            publisher,
            max_token_attempts,
        ));
        let requests = Arc::new(FileRequestService::new(repos.requests, files.clone()));
        let users = Arc::new(UserService::new(repos.users));

        (
            Self {
                files,
                requests,
                users,
            },
            receiver,
        )
    }

    /// The listener that resolves requests answered by file updates.
    pub fn listener(&self) -> FileUpdatedListener {
        FileUpdatedListener::new(self.requests.clone())
    }
}

//! File upload and listing configuration.

use serde::{Deserialize, Serialize};

use crate::types::pagination::DEFAULT_PAGE_SIZE;

/// Settings for uploads, download tokens, and listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Length of generated download tokens.
    #[serde(default = "default_token_length")]
    pub token_length: usize,
    /// Candidate tokens tried before an upload gives up.
    #[serde(default = "default_max_token_attempts")]
    pub max_token_attempts: u32,
    /// Page size used when a listing does not specify one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            token_length: default_token_length(),
            max_token_attempts: default_max_token_attempts(),
            default_page_size: default_page_size(),
        }
    }
}

fn default_token_length() -> usize {
    100
}

fn default_max_token_attempts() -> u32 {
    16
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled purge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is started.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for the purge job.
    #[serde(default = "default_purge_cron")]
    pub purge_cron: String,
    /// Files not downloaded for this many days are purged.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            purge_cron: default_purge_cron(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_purge_cron() -> String {
    "0 0 0 * * *".to_string()
}

fn default_retention_days() -> u32 {
    14
}

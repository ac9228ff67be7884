//! Scheduled maintenance for BlockShare.
//!
//! This crate provides:
//! - A cron scheduler driving periodic tasks
//! - The purge job deleting files nobody downloaded within the retention window

pub mod jobs;
pub mod scheduler;

pub use jobs::{JobExecutionError, PurgeJobHandler};
pub use scheduler::CronScheduler;

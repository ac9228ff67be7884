//! File domain entities.

pub mod model;
pub mod status;

pub use model::{CreateFile, File, FileContent, FileWithOwner};
pub use status::FileStatus;

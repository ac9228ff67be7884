//! Domain events emitted by BlockShare operations.
//!
//! Events travel over typed channels owned by the service layer; the
//! publisher never knows which component consumes them.

pub mod file;

pub use file::FileEvent;

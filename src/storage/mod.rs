//! Persistence for generated images
//!
//! Writes decoded image bytes under caller-chosen file names. The disk store
//! is used in production; the mock keeps files in memory for tests.

pub mod disk;
pub mod mock;

pub use disk::DiskImageStore;
pub use mock::MockImageStore;

use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `data` as `file_name`, replacing any existing file, and return its location.
    async fn write_image(&self, file_name: &str, data: &[u8]) -> Result<PathBuf>;
}

use super::ImageStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct DiskImageStore {
    output_dir: PathBuf,
}

impl DiskImageStore {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn write_image(&self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        // Names come from the handler, but refuse anything that would leave the output dir.
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name == ".." {
            return Err(Error::Generic(format!(
                "Refusing to write image with unsafe name '{}'",
                file_name
            )));
        }

        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }
}

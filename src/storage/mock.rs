use super::ImageStore;
use crate::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockImageStore {
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    base_path: PathBuf,
    write_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(BTreeMap::new())),
            base_path: PathBuf::from("/tmp"),
            write_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_write_count(&self) -> usize {
        *self.write_count.lock().unwrap()
    }

    /// Stored files keyed by name, in name order.
    pub fn get_files(&self) -> BTreeMap<String, Vec<u8>> {
        self.files.lock().unwrap().clone()
    }
}

impl Default for MockImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn write_image(&self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        if *self.should_fail.lock().unwrap() {
            return Err(crate::Error::Io(std::io::Error::other("Mock failure")));
        }

        *self.write_count.lock().unwrap() += 1;
        self.files
            .lock()
            .unwrap()
            .insert(file_name.to_string(), data.to_vec());
        Ok(self.base_path.join(file_name))
    }
}

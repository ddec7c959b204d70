//! Local File Store
//!
//! Stores binary payloads as plain files under a base directory.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::StoreError;

use super::FileStore;

/// Filesystem-backed payload storage.
pub struct LocalFileStore {
    base_dir: PathBuf,
}

impl LocalFileStore {
    /// Opens the store, creating the base directory if needed.
    pub async fn new(base_dir: &str) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(base_dir).await?;
        Ok(Self {
            base_dir: PathBuf::from(base_dir),
        })
    }

    /// Reduces a client-supplied name to a bare file name so stored
    /// payloads can never escape the base directory.
    fn sanitize_name(name: &str) -> &str {
        let last = name.rsplit(['/', '\\']).next().unwrap_or(name);
        match last {
            "" | "." | ".." => "unnamed",
            other => other,
        }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        let path = self.base_dir.join(Self::sanitize_name(name));
        tokio::fs::write(&path, bytes).await?;

        let path = path.to_string_lossy().into_owned();
        debug!("Saved {} bytes to {}", bytes.len(), path);
        Ok(path)
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        tokio::fs::remove_file(path).await?;
        debug!("Removed stored file {}", path);
        Ok(())
    }
}

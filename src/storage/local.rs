// src/storage/local.rs

//! Local filesystem history backend.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::HistoryEntry;
use crate::storage::HistoryStorage;

/// History backend writing one pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct LocalHistoryStorage {
    path: PathBuf,
}

impl LocalHistoryStorage {
    /// Create a backend for `file_name` under `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>, file_name: &str) -> Self {
        Self {
            path: root_dir.into().join(file_name),
        }
    }

    /// Full path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Ensure the parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl HistoryStorage for LocalHistoryStorage {
    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        self.write_bytes(&bytes).await
    }
}

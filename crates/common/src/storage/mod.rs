//! Blob storage for uploaded document bytes
//!
//! Blobs are addressed by the path returned from `store`; file names are
//! generated UUIDs that keep the original extension.

use crate::errors::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist bytes and return the path they can be read back from
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String>;

    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Remove a blob. Returns false when nothing was stored at `path`.
    async fn delete(&self, path: &str) -> Result<bool>;
}

fn blob_name(extension: &str) -> String {
    let ext: String = extension
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    if ext.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", Uuid::new_v4(), ext)
    }
}

/// Filesystem store rooted at a configured upload directory
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.root.join(blob_name(extension));
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Blob stored");
        Ok(path.to_string_lossy().into_owned())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::BlobNotFound {
                path: path.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Blob store kept in process memory
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String> {
        let path = format!("memory/{}", blob_name(extension));
        self.blobs.write().await.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::BlobNotFound { path: path.to_string() })
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        Ok(self.blobs.write().await.remove(path).is_some())
    }
}

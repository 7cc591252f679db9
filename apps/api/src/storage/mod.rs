use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

const FALLBACK_FILENAME: &str = "upload.json";

/// Destination for raw uploaded exports. A stored upload lives only until
/// the request that saved it calls `remove`.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persists `data` and returns where it was written.
    async fn save(&self, upload_id: Uuid, filename: &str, data: &Bytes) -> Result<PathBuf>;

    /// Deletes an upload previously returned by `save`.
    async fn remove(&self, path: &Path) -> Result<()>;
}

/// Writes uploads into a single directory as `<upload_id>_<filename>`.
#[derive(Debug, Clone)]
pub struct DiskUploadStore {
    dir: PathBuf,
}

impl DiskUploadStore {
    /// Creates the upload directory if it does not exist yet.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create upload directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl UploadStore for DiskUploadStore {
    async fn save(&self, upload_id: Uuid, filename: &str, data: &Bytes) -> Result<PathBuf> {
        let path = self
            .dir
            .join(format!("{upload_id}_{}", sanitize_filename(filename)));
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write upload to {}", path.display()))?;
        debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(path)
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_file(path)
            .await
            .with_context(|| format!("Failed to remove upload {}", path.display()))?;
        debug!("Removed {}", path.display());
        Ok(())
    }
}

/// Reduces a client-supplied name to a safe single path component.
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned
    }
}

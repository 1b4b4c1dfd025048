//! Filesystem-based asset storage.
//!
//! Assets live under `{base_path}/{category}/{sha256}.{ext}` and are addressed
//! externally as `{bucket}/{category}/{sha256}.{ext}`.

use crate::{AssetCategory, AssetNamer, AssetStore, content_filename, content_hash};
use std::path::PathBuf;
use storycraft_error::{StorageError, StorageErrorKind, StorycraftResult};
use uuid::Uuid;

/// Filesystem storage backend.
///
/// # Example Structure
///
/// ```text
/// ./storycraft_output/
/// ├── mock-images/
/// │   └── 3f2a...e1.png
/// ├── scene_keyframes/
/// │   └── 9b0c...47.png
/// ├── video_clips/
/// │   └── 51de...0a.mp4
/// └── final_videos/
///     └── c8f1...22.mp4
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemAssetStore {
    base_path: PathBuf,
    namer: AssetNamer,
}

impl FileSystemAssetStore {
    /// Create a filesystem store rooted at `base_path`, naming assets under `bucket`.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path, bucket))]
    pub fn new(base_path: impl Into<PathBuf>, bucket: impl Into<String>) -> StorycraftResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem asset store");
        Ok(Self {
            base_path,
            namer: AssetNamer::new(bucket),
        })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn path_for(&self, category: AssetCategory, filename: &str) -> PathBuf {
        self.base_path.join(category.to_string()).join(filename)
    }

    fn resolve(&self, uri: &str) -> StorycraftResult<(PathBuf, String)> {
        let (category, filename) = self
            .namer
            .parse(uri)
            .ok_or_else(|| StorageError::new(StorageErrorKind::InvalidUri(uri.to_string())))?;
        let hash = filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(filename)
            .to_string();
        Ok((self.path_for(category, filename), hash))
    }
}

#[async_trait::async_trait]
impl AssetStore for FileSystemAssetStore {
    #[tracing::instrument(skip(self, data), fields(size = data.len(), category = %category))]
    async fn store(&self, data: &[u8], category: AssetCategory) -> StorycraftResult<String> {
        let filename = content_filename(data, category);
        let path = self.path_for(category, &filename);
        let uri = self.namer.uri(category, &filename);

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "Asset already exists, returning existing URI");
            return Ok(uri);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Unique temp name so concurrent writers of the same content never share a file
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(uri = %uri, size = data.len(), "Stored asset");
        Ok(uri)
    }

    #[tracing::instrument(skip(self))]
    async fn retrieve(&self, uri: &str) -> StorycraftResult<Vec<u8>> {
        let (path, expected_hash) = self.resolve(uri)?;

        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(uri.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        let actual_hash = content_hash(&data);
        if actual_hash != expected_hash {
            return Err(StorageError::new(StorageErrorKind::HashMismatch(format!(
                "expected {}, got {}",
                expected_hash, actual_hash
            )))
            .into());
        }

        tracing::debug!(size = data.len(), "Retrieved asset");
        Ok(data)
    }

    #[tracing::instrument(skip(self))]
    async fn exists(&self, uri: &str) -> StorycraftResult<bool> {
        match self.namer.parse(uri) {
            Some((category, filename)) => Ok(tokio::fs::try_exists(self.path_for(category, filename))
                .await
                .unwrap_or(false)),
            None => Ok(false),
        }
    }

    fn namer(&self) -> &AssetNamer {
        &self.namer
    }
}

//! In-memory asset storage.

use crate::{AssetCategory, AssetNamer, AssetStore, content_filename};
use std::collections::HashMap;
use storycraft_error::{StorageError, StorageErrorKind, StorycraftResult};
use tokio::sync::RwLock;

/// Asset store that keeps everything in a map. Useful for tests and dry runs.
///
/// # Examples
///
/// ```
/// use storycraft_storage::{AssetCategory, AssetStore, InMemoryAssetStore};
///
/// # async fn example() -> storycraft_error::StorycraftResult<()> {
/// let store = InMemoryAssetStore::new("gs://bucket");
/// let uri = store.store(b"png", AssetCategory::SceneKeyframes).await?;
/// assert!(store.exists(&uri).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryAssetStore {
    namer: AssetNamer,
    assets: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAssetStore {
    /// Create an empty store naming assets under `bucket`.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            namer: AssetNamer::new(bucket),
            assets: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored assets.
    pub async fn len(&self) -> usize {
        self.assets.read().await.len()
    }

    /// Whether nothing has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.assets.read().await.is_empty()
    }

    /// Stored URIs in a category, sorted.
    pub async fn uris_in(&self, category: AssetCategory) -> Vec<String> {
        let assets = self.assets.read().await;
        let mut uris: Vec<String> = assets
            .keys()
            .filter(|uri| {
                self.namer
                    .parse(uri)
                    .is_some_and(|(stored, _)| stored == category)
            })
            .cloned()
            .collect();
        uris.sort();
        uris
    }
}

#[async_trait::async_trait]
impl AssetStore for InMemoryAssetStore {
    #[tracing::instrument(skip(self, data), fields(size = data.len(), category = %category))]
    async fn store(&self, data: &[u8], category: AssetCategory) -> StorycraftResult<String> {
        let uri = self.namer.uri(category, &content_filename(data, category));
        self.assets
            .write()
            .await
            .entry(uri.clone())
            .or_insert_with(|| data.to_vec());
        tracing::debug!(uri = %uri, "Stored asset in memory");
        Ok(uri)
    }

    #[tracing::instrument(skip(self))]
    async fn retrieve(&self, uri: &str) -> StorycraftResult<Vec<u8>> {
        if self.namer.parse(uri).is_none() {
            return Err(StorageError::new(StorageErrorKind::InvalidUri(uri.to_string())).into());
        }
        self.assets
            .read()
            .await
            .get(uri)
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(uri.to_string())).into())
    }

    async fn exists(&self, uri: &str) -> StorycraftResult<bool> {
        Ok(self.assets.read().await.contains_key(uri))
    }

    fn namer(&self) -> &AssetNamer {
        &self.namer
    }
}

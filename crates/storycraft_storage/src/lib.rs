//! Bucket-addressed asset storage for StoryCraft.
//!
//! Every generated artifact (reference images, keyframes, clips, narration,
//! music, final movies) is persisted through an [`AssetStore`], which returns a
//! URI of the form `{bucket}/{category}/{filename}`. Failures are represented by
//! the sentinel `{bucket}/error.{ext}` built by [`AssetNamer`].
//!
//! # Features
//!
//! - **Content-addressable names**: file names are the SHA-256 of the content
//! - **Atomic writes**: the filesystem backend writes a temp file then renames it
//! - **In-memory backend**: for tests and dry runs
//!
//! # Example
//!
//! ```rust
//! use storycraft_storage::{AssetCategory, AssetStore, FileSystemAssetStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemAssetStore::new("/tmp/storycraft", "gs://bucket/out")?;
//!
//! let uri = store.store(b"mp3 bytes", AssetCategory::Music).await?;
//! assert!(uri.starts_with("gs://bucket/out/music/"));
//!
//! let bytes = store.retrieve(&uri).await?;
//! assert_eq!(bytes, b"mp3 bytes");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use sha2::{Digest, Sha256};
use storycraft_error::StorycraftResult;

mod category;
mod filesystem;
mod memory;
mod naming;

pub use category::{AssetCategory, MediaType};
pub use filesystem::FileSystemAssetStore;
pub use memory::InMemoryAssetStore;
pub use naming::AssetNamer;
pub use storycraft_error::{StorageError, StorageErrorKind};

/// Trait for pluggable asset storage backends.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// Store bytes under a category and return the asset URI.
    ///
    /// Storing identical content twice returns the same URI.
    async fn store(&self, data: &[u8], category: AssetCategory) -> StorycraftResult<String>;

    /// Retrieve the bytes behind a URI returned by [`store`](AssetStore::store).
    async fn retrieve(&self, uri: &str) -> StorycraftResult<Vec<u8>>;

    /// Check whether an asset exists.
    async fn exists(&self, uri: &str) -> StorycraftResult<bool>;

    /// Namer for this store's bucket.
    fn namer(&self) -> &AssetNamer;
}

/// Content-addressed file name: `{sha256}.{ext}`.
pub fn content_filename(data: &[u8], category: AssetCategory) -> String {
    format!("{}.{}", content_hash(data), category.extension())
}

fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

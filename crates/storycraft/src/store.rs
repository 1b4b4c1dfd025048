//! Asset store selection.

use std::sync::Arc;
use storycraft_error::StorycraftResult;
use storycraft_retry::StorycraftConfig;
use storycraft_storage::{AssetStore, FileSystemAssetStore, InMemoryAssetStore};
use tracing::info;

/// Where a run keeps its assets.
///
/// ```
/// use storycraft::StoreKind;
///
/// let kind: StoreKind = "filesystem".parse().unwrap();
/// assert_eq!(kind, StoreKind::Filesystem);
/// assert_eq!(StoreKind::Memory.to_string(), "memory");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    derive_more::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum StoreKind {
    /// Process memory, gone when the run ends
    #[default]
    #[display("memory")]
    #[strum(serialize = "memory")]
    Memory,
    /// Content-addressed files under `storage.base_path`
    #[display("filesystem")]
    #[strum(serialize = "filesystem")]
    Filesystem,
}

/// Open the asset store a run writes into.
///
/// Both kinds hand out URIs under `pipeline.bucket`.
///
/// # Errors
///
/// Returns a storage error if the filesystem root cannot be created.
pub fn open_store(kind: StoreKind, config: &StorycraftConfig) -> StorycraftResult<Arc<dyn AssetStore>> {
    let bucket = config.pipeline().bucket().clone();
    match kind {
        StoreKind::Memory => Ok(Arc::new(InMemoryAssetStore::new(bucket))),
        StoreKind::Filesystem => {
            let base_path = config.storage().base_path().clone();
            info!(path = %base_path.display(), "Storing assets on disk");
            Ok(Arc::new(FileSystemAssetStore::new(base_path, bucket)?))
        }
    }
}

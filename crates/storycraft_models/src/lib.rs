//! Capability implementations for StoryCraft.
//!
//! The [`mock`] module provides deterministic, network-free implementations of
//! every capability trait in `storycraft_interface`. They persist placeholder
//! payloads through an [`AssetStore`], so every URI they hand back resolves to
//! a real asset.
//!
//! ```
//! use std::sync::Arc;
//! use storycraft_models::mock_capabilities;
//! use storycraft_storage::InMemoryAssetStore;
//!
//! let store = Arc::new(InMemoryAssetStore::new("gs://bucket/out"));
//! let capabilities = mock_capabilities(store, 2).unwrap();
//! assert_eq!(capabilities.text().model_name(), "mock-text");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod mock;

pub use mock::{
    MockImageGenerator, MockMusicGenerator, MockSpeechSynthesizer, MockStitchAssembler,
    MockTextGenerator, MockVideoGenerator, scenario, storyboard,
};

use std::sync::Arc;
use storycraft_error::{ConfigError, StorycraftResult};
use storycraft_interface::Capabilities;
use storycraft_storage::AssetStore;

/// Bundle every mock capability around one asset store.
///
/// Video jobs complete after `video_polls` pending polls.
///
/// # Errors
///
/// Returns `ConfigError` if the bundle cannot be assembled.
pub fn mock_capabilities(
    store: Arc<dyn AssetStore>,
    video_polls: usize,
) -> StorycraftResult<Capabilities> {
    Capabilities::builder()
        .text(Arc::new(MockTextGenerator::new()))
        .image(Arc::new(MockImageGenerator::new(store.clone())))
        .video(Arc::new(MockVideoGenerator::new(store.clone(), video_polls)))
        .speech(Arc::new(MockSpeechSynthesizer::new(store.clone())))
        .music(Arc::new(MockMusicGenerator::new(store.clone())))
        .stitch(Arc::new(MockStitchAssembler::new(store.clone())))
        .store(store)
        .build()
        .map_err(|e| ConfigError::new(format!("Failed to assemble capabilities: {}", e)).into())
}

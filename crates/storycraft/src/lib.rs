//! StoryCraft - pitch to short video
//!
//! StoryCraft turns a one-line story pitch into a narrated, scored short
//! video. A pitch is expanded into a scenario with characters, settings and
//! props; every roster entry gets a reference image; a storyboard splits the
//! story into scenes; each scene gets a keyframe, a clip and a voiceover; and
//! the clips are stitched with background music into the final movie.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use storycraft::{InMemoryAssetStore, Pipeline, ScenarioRequest, StorycraftConfig, mock_capabilities};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorycraftConfig::load()?;
//! let store = Arc::new(InMemoryAssetStore::new(config.pipeline().bucket()));
//! let pipeline = Pipeline::from_config(mock_capabilities(store, 1)?, &config);
//!
//! let request = ScenarioRequest::builder()
//!     .pitch("A lone astronaut discovers a glowing plant on the moon")
//!     .num_scenes(3u32)
//!     .build()?;
//! let output = pipeline.run(request).await;
//! println!("{}", output.final_uri);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! StoryCraft is organized as a workspace with focused crates:
//!
//! - `storycraft_error` - Error types
//! - `storycraft_core` - Blueprint, roster and scene data model
//! - `storycraft_interface` - Capability traits (text, image, video, speech, music, stitch)
//! - `storycraft_retry` - Retry policy and layered configuration
//! - `storycraft_storage` - Asset stores and URI naming
//! - `storycraft_models` - Deterministic mock capabilities
//! - `storycraft_pipeline` - Stages and the orchestrator
//!
//! This crate (`storycraft`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod store;

pub use store::{StoreKind, open_store};

pub use storycraft_core::*;
pub use storycraft_error::*;
pub use storycraft_interface::*;
pub use storycraft_models::{
    MockImageGenerator, MockMusicGenerator, MockSpeechSynthesizer, MockStitchAssembler,
    MockTextGenerator, MockVideoGenerator, mock_capabilities,
};
pub use storycraft_pipeline::*;
pub use storycraft_retry::*;
pub use storycraft_storage::{
    AssetCategory, AssetNamer, AssetStore, FileSystemAssetStore, InMemoryAssetStore, MediaType,
    content_filename,
};

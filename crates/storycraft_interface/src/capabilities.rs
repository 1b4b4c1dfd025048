//! Bundle of capability instances shared by one pipeline.

use crate::{
    ImageGenerator, MusicGenerator, SpeechSynthesizer, StitchAssembler, TextGenerator,
    VideoGenerator,
};
use std::sync::Arc;
use storycraft_storage::AssetStore;

/// One shared instance of every capability plus the asset store.
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone, derive_getters::Getters, derive_builder::Builder)]
#[builder(pattern = "owned")]
pub struct Capabilities {
    /// Scenario and storyboard text
    text: Arc<dyn TextGenerator>,
    /// Reference images and keyframes
    image: Arc<dyn ImageGenerator>,
    /// Scene clips
    video: Arc<dyn VideoGenerator>,
    /// Narration
    speech: Arc<dyn SpeechSynthesizer>,
    /// Background music
    music: Arc<dyn MusicGenerator>,
    /// Final assembly
    stitch: Arc<dyn StitchAssembler>,
    /// Where generated assets live
    store: Arc<dyn AssetStore>,
}

impl Capabilities {
    /// Start building a bundle.
    pub fn builder() -> CapabilitiesBuilder {
        CapabilitiesBuilder::default()
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("text", &self.text.model_name())
            .field("bucket", &self.store.namer().bucket())
            .finish_non_exhaustive()
    }
}

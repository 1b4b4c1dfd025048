//! Capability traits for the StoryCraft video pipeline.
//!
//! This crate defines the injectable interfaces through which the pipeline
//! reaches text, image, video, speech and music generation plus the final
//! assembler. Real backends and the deterministic mocks in `storycraft_models`
//! both implement these traits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capabilities;
mod traits;
mod types;

pub use capabilities::{Capabilities, CapabilitiesBuilder};
pub use traits::{
    ImageGenerator, MusicGenerator, SpeechSynthesizer, StitchAssembler, TextGenerator,
    VideoGenerator,
};
pub use types::{
    ImageRequest, ImageRequestBuilder, StitchRequest, StitchRequestBuilder, VideoJob,
    VideoJobStatus, VideoRequest, VideoRequestBuilder,
};

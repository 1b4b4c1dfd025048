//! Request and response types exchanged with generation capabilities.

use serde::{Deserialize, Serialize};
use storycraft_core::AspectRatio;
use storycraft_storage::AssetCategory;

/// One image generation request.
///
/// # Examples
///
/// ```
/// use storycraft_core::AspectRatio;
/// use storycraft_interface::ImageRequest;
/// use storycraft_storage::AssetCategory;
///
/// let request = ImageRequest::builder()
///     .prompt("Style: Cinematic. Shot: medium. An astronaut")
///     .aspect_ratio(AspectRatio::Square)
///     .category(AssetCategory::ReferenceImages)
///     .asset_name("eva")
///     .build()
///     .unwrap();
///
/// assert!(request.reference_images().is_empty());
/// assert_eq!(request.asset_name().as_deref(), Some("eva"));
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// Text prompt (structured prompts are rendered as JSON text)
    prompt: String,
    /// URIs of reference images the result should stay consistent with
    #[builder(default)]
    reference_images: Vec<String>,
    /// Output aspect ratio
    #[builder(default)]
    aspect_ratio: AspectRatio,
    /// Bucket folder the image is stored under
    category: AssetCategory,
    /// Human-readable name for logs and file naming
    #[builder(default, setter(into, strip_option))]
    asset_name: Option<String>,
}

impl ImageRequest {
    /// Start building a request.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}

/// One video clip generation request.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct VideoRequest {
    /// Keyframe image URI the clip starts from
    keyframe_uri: String,
    /// Clip prompt (action, camera motion, ambient audio)
    prompt: String,
    /// Clip length in seconds
    duration_seconds: u32,
    /// Clip aspect ratio
    #[builder(default)]
    aspect_ratio: AspectRatio,
}

impl VideoRequest {
    /// Start building a request.
    pub fn builder() -> VideoRequestBuilder {
        VideoRequestBuilder::default()
    }
}

/// Handle to a submitted long-running video job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", id)]
pub struct VideoJob {
    /// Operation identifier assigned by the video capability
    pub id: String,
}

impl VideoJob {
    /// Wrap an operation identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// State of a video job as reported by one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::EnumIs)]
pub enum VideoJobStatus {
    /// Still rendering
    Pending,
    /// Finished, with the clip URI
    Completed(String),
    /// Finished unsuccessfully, with the reported reason
    Failed(String),
}

/// Everything the assembler needs to produce the final movie.
///
/// `clips` and `voiceovers` are parallel lists in scene order; a scene without
/// narration has an empty string in `voiceovers`.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct StitchRequest {
    /// Clip URIs in scene order
    clips: Vec<String>,
    /// Voiceover URIs parallel to `clips`
    voiceovers: Vec<String>,
    /// Shared background music, if it could be generated
    #[builder(default, setter(into, strip_option))]
    music: Option<String>,
    /// Music level while narration plays, in [0, 1]
    #[builder(default = "0.2")]
    music_volume_under_speech: f64,
    /// Fade-out applied to the end of the mixed track
    #[builder(default = "2.0")]
    fade_out_secs: f64,
}

impl StitchRequest {
    /// Start building a request.
    pub fn builder() -> StitchRequestBuilder {
        StitchRequestBuilder::default()
    }
}

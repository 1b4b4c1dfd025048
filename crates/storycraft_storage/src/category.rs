//! Asset categories and media types.

/// Kind of media content.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum MediaType {
    /// PNG images
    #[display("image")]
    Image,
    /// MP3 audio
    #[display("audio")]
    Audio,
    /// MP4 video
    #[display("video")]
    Video,
}

impl MediaType {
    /// File extension for stored assets and error sentinels.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Image => "png",
            MediaType::Audio => "mp3",
            MediaType::Video => "mp4",
        }
    }

    /// MIME type of stored assets.
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaType::Image => "image/png",
            MediaType::Audio => "audio/mpeg",
            MediaType::Video => "video/mp4",
        }
    }
}

/// Bucket folder an asset is stored under.
///
/// # Examples
///
/// ```
/// use storycraft_storage::{AssetCategory, MediaType};
///
/// let category: AssetCategory = "scene_keyframes".parse().unwrap();
/// assert_eq!(category, AssetCategory::SceneKeyframes);
/// assert_eq!(category.media_type(), MediaType::Image);
/// assert_eq!(AssetCategory::FinalVideos.to_string(), "final_videos");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumString,
    derive_more::Display,
)]
pub enum AssetCategory {
    /// Character, setting and prop reference images
    #[display("mock-images")]
    #[strum(serialize = "mock-images")]
    ReferenceImages,
    /// Narration tracks
    #[display("voiceovers")]
    #[strum(serialize = "voiceovers")]
    Voiceovers,
    /// Background music
    #[display("music")]
    #[strum(serialize = "music")]
    Music,
    /// Scene keyframe images
    #[display("scene_keyframes")]
    #[strum(serialize = "scene_keyframes")]
    SceneKeyframes,
    /// Generated scene clips
    #[display("video_clips")]
    #[strum(serialize = "video_clips")]
    VideoClips,
    /// Stitched movies
    #[display("final_videos")]
    #[strum(serialize = "final_videos")]
    FinalVideos,
}

impl AssetCategory {
    /// Media type stored under this category.
    pub fn media_type(&self) -> MediaType {
        match self {
            AssetCategory::ReferenceImages | AssetCategory::SceneKeyframes => MediaType::Image,
            AssetCategory::Voiceovers | AssetCategory::Music => MediaType::Audio,
            AssetCategory::VideoClips | AssetCategory::FinalVideos => MediaType::Video,
        }
    }

    /// File extension of assets in this category.
    pub fn extension(&self) -> &'static str {
        self.media_type().extension()
    }
}

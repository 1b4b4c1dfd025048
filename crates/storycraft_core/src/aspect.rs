//! Aspect ratios and blueprint-level video settings.

use serde::{Deserialize, Serialize};

/// Clip duration used when the blueprint does not specify one.
pub const DEFAULT_DURATION_SECONDS: u32 = 8;

/// Frame aspect ratio for generated images and clips.
///
/// # Examples
///
/// ```
/// use storycraft_core::AspectRatio;
///
/// let ratio: AspectRatio = "16:9".parse().unwrap();
/// assert_eq!(ratio, AspectRatio::Landscape);
/// assert_eq!(ratio.to_string(), "16:9");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum AspectRatio {
    /// 1:1
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    #[display("1:1")]
    Square,
    /// 16:9
    #[default]
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    #[display("16:9")]
    Landscape,
    /// 9:16
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    #[display("9:16")]
    Portrait,
}

/// Resolved video settings for clip generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoSettings {
    /// Clip aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Clip duration in seconds
    pub duration_seconds: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Landscape,
            duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }
}

//! Run settings resolved from configuration.

use std::time::Duration;
use storycraft_core::AspectRatio;
use storycraft_retry::{RetryPolicy, StorycraftConfig};

/// Everything the stages need to know beyond the blueprint itself.
///
/// # Examples
///
/// ```
/// use storycraft_pipeline::PipelineSettings;
///
/// let settings = PipelineSettings::builder().concurrency(4usize).build().unwrap();
/// assert_eq!(*settings.concurrency(), 4);
/// assert_eq!(settings.narrator_voice(), "en-US-Studio-O");
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct PipelineSettings {
    /// Voice used for every voiceover
    #[builder(default = "\"en-US-Studio-O\".to_string()")]
    narrator_voice: String,
    /// Scenes processed at once
    #[builder(default = "1")]
    concurrency: usize,
    /// Whole-run budget
    #[builder(default)]
    run_timeout: Option<Duration>,
    /// Clip aspect ratio when the blueprint does not set one
    #[builder(default)]
    aspect_ratio: AspectRatio,
    /// Clip duration when the blueprint does not set one
    #[builder(default = "8")]
    duration_seconds: u32,
    /// Delay between video job polls
    #[builder(default = "Duration::from_secs(5)")]
    poll_interval: Duration,
    /// Budget for one video job
    #[builder(default = "Duration::from_secs(600)")]
    poll_timeout: Duration,
    /// Music level while narration plays
    #[builder(default = "0.2")]
    music_volume_under_speech: f64,
    /// Fade-out at the end of the movie
    #[builder(default = "2.0")]
    fade_out_secs: f64,
    /// Backoff applied to every external call
    #[builder(default)]
    retry: RetryPolicy,
}

impl PipelineSettings {
    /// Start building settings from defaults.
    pub fn builder() -> PipelineSettingsBuilder {
        PipelineSettingsBuilder::default()
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            narrator_voice: "en-US-Studio-O".to_string(),
            concurrency: 1,
            run_timeout: None,
            aspect_ratio: AspectRatio::default(),
            duration_seconds: 8,
            poll_interval: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(600),
            music_volume_under_speech: 0.2,
            fade_out_secs: 2.0,
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&StorycraftConfig> for PipelineSettings {
    fn from(config: &StorycraftConfig) -> Self {
        let pipeline = config.pipeline();
        let video = config.video();
        let stitch = config.stitch();
        Self {
            narrator_voice: pipeline.narrator_voice().clone(),
            concurrency: *pipeline.concurrency(),
            run_timeout: pipeline.run_timeout_secs().map(Duration::from_secs),
            aspect_ratio: *video.aspect_ratio(),
            duration_seconds: *video.duration_seconds(),
            poll_interval: Duration::from_millis(*video.poll_interval_ms()),
            poll_timeout: Duration::from_secs(*video.poll_timeout_secs()),
            music_volume_under_speech: *stitch.music_volume_under_speech(),
            fade_out_secs: *stitch.fade_out_secs(),
            retry: RetryPolicy::from(config.retry()),
        }
    }
}

//! Layered configuration for the pipeline.
//!
//! This module provides TOML-based configuration. The configuration system supports:
//! - Bundled defaults (include_str! from storycraft.toml)
//! - User overrides (~/.config/storycraft/storycraft.toml, then ./storycraft.toml)
//! - Environment overrides (`STORYCRAFT__SECTION__KEY`)

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storycraft_core::{AspectRatio, Language};
use storycraft_error::{ConfigError, StorycraftError, StorycraftResult};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../storycraft.toml");

/// `[pipeline]` section.
///
/// ```toml
/// [pipeline]
/// bucket = "gs://storycraft-bucket/storycraft_output"
/// num_scenes = 5
/// concurrency = 1
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct PipelineConfig {
    /// Bucket prefix for every asset URI
    bucket: String,
    /// Scenes requested when the caller does not say
    num_scenes: u32,
    /// Visual style applied to every image
    style: String,
    /// Narration language display name
    language_name: String,
    /// Narration language code
    language_code: String,
    /// Voice used for every voiceover
    narrator_voice: String,
    /// Scenes processed at once
    concurrency: usize,
    /// Whole-run budget; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    run_timeout_secs: Option<u64>,
}

impl PipelineConfig {
    /// Configured narration language.
    pub fn language(&self) -> Language {
        Language::new(&self.language_name, &self.language_code)
    }
}

/// `[video]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct VideoConfig {
    /// Default clip aspect ratio
    aspect_ratio: AspectRatio,
    /// Default clip duration in seconds
    duration_seconds: u32,
    /// Delay between job polls
    poll_interval_ms: u64,
    /// Budget for one clip job
    poll_timeout_secs: u64,
}

/// `[stitch]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct StitchConfig {
    /// Music level while narration plays, in [0, 1]
    music_volume_under_speech: f64,
    /// Fade-out at the end of the movie
    fade_out_secs: f64,
}

/// `[retry]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct RetryConfig {
    /// Retry transient failures at all
    enabled: bool,
    /// First backoff delay
    initial_backoff_ms: u64,
    /// Retries after the first attempt
    max_retries: usize,
    /// Upper bound on a single delay
    max_delay_secs: u64,
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct StorageConfig {
    /// Root directory of the filesystem store
    base_path: PathBuf,
}

/// Top-level StoryCraft configuration.
///
/// # Example
///
/// ```no_run
/// use storycraft_retry::StorycraftConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StorycraftConfig::load()?;
/// println!("Scenes per run: {}", config.pipeline().num_scenes());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
pub struct StorycraftConfig {
    /// Pipeline settings
    pipeline: PipelineConfig,
    /// Clip generation settings
    video: VideoConfig,
    /// Final mix settings
    stitch: StitchConfig,
    /// Retry policy settings
    retry: RetryConfig,
    /// Filesystem store settings
    storage: StorageConfig,
}

impl StorycraftConfig {
    /// The bundled defaults alone, without user files or environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse.
    pub fn bundled() -> StorycraftResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from the bundled defaults overlaid with one explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the result is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StorycraftResult<Self> {
        debug!("Loading configuration from file");

        if !path.as_ref().exists() {
            return Err(ConfigError::new(format!(
                "Configuration file not found: {}",
                path.as_ref().display()
            ))
            .into());
        }

        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration with precedence (later sources override earlier):
    /// 1. Bundled defaults (storycraft.toml shipped with the crate)
    /// 2. User config in home directory (~/.config/storycraft/storycraft.toml)
    /// 3. User config in current directory (./storycraft.toml)
    /// 4. `STORYCRAFT__SECTION__KEY` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a present source fails to parse or the result is invalid.
    #[instrument]
    pub fn load() -> StorycraftResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storycraft/storycraft.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("storycraft").required(false))
            .add_source(
                Environment::with_prefix("STORYCRAFT")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> StorycraftResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                StorycraftError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StorycraftError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for zero concurrency, zero scene count, zero poll
    /// interval, a music volume outside [0, 1] or an empty bucket.
    pub fn validate(&self) -> StorycraftResult<()> {
        if self.pipeline.bucket.trim().is_empty() {
            return invalid("pipeline.bucket must not be empty");
        }
        if self.pipeline.concurrency == 0 {
            return invalid("pipeline.concurrency must be at least 1");
        }
        if self.pipeline.num_scenes == 0 {
            return invalid("pipeline.num_scenes must be at least 1");
        }
        if self.pipeline.run_timeout_secs == Some(0) {
            return invalid("pipeline.run_timeout_secs must be positive when set");
        }
        if self.video.poll_interval_ms == 0 {
            return invalid("video.poll_interval_ms must be positive");
        }
        if self.video.duration_seconds == 0 {
            return invalid("video.duration_seconds must be positive");
        }
        if !(0.0..=1.0).contains(&self.stitch.music_volume_under_speech) {
            return invalid("stitch.music_volume_under_speech must be within [0, 1]");
        }
        if self.stitch.fade_out_secs < 0.0 {
            return invalid("stitch.fade_out_secs must not be negative");
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> StorycraftResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::new(format!("Failed to render configuration: {}", e)).into()
        })
    }

    /// Apply command-line overrides on top of loaded values.
    pub fn with_overrides(mut self, overrides: PipelineOverrides) -> Self {
        if let Some(num_scenes) = overrides.num_scenes {
            self.pipeline.num_scenes = num_scenes;
        }
        if let Some(style) = overrides.style {
            self.pipeline.style = style;
        }
        if let Some(name) = overrides.language_name {
            self.pipeline.language_name = name;
        }
        if let Some(code) = overrides.language_code {
            self.pipeline.language_code = code;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.pipeline.concurrency = concurrency;
        }
        if let Some(secs) = overrides.run_timeout_secs {
            self.pipeline.run_timeout_secs = Some(secs);
        }
        if let Some(ms) = overrides.poll_interval_ms {
            self.video.poll_interval_ms = ms;
        }
        if let Some(enabled) = overrides.retry_enabled {
            self.retry.enabled = enabled;
        }
        if let Some(ms) = overrides.initial_backoff_ms {
            self.retry.initial_backoff_ms = ms;
        }
        self
    }
}

#[track_caller]
fn invalid(message: &str) -> StorycraftResult<()> {
    Err(ConfigError::new(message).into())
}

/// Values that may replace loaded configuration, typically from CLI flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOverrides {
    /// Replaces `pipeline.num_scenes`
    pub num_scenes: Option<u32>,
    /// Replaces `pipeline.style`
    pub style: Option<String>,
    /// Replaces `pipeline.language_name`
    pub language_name: Option<String>,
    /// Replaces `pipeline.language_code`
    pub language_code: Option<String>,
    /// Replaces `pipeline.concurrency`
    pub concurrency: Option<usize>,
    /// Replaces `pipeline.run_timeout_secs`
    pub run_timeout_secs: Option<u64>,
    /// Replaces `video.poll_interval_ms`
    pub poll_interval_ms: Option<u64>,
    /// Replaces `retry.enabled`
    pub retry_enabled: Option<bool>,
    /// Replaces `retry.initial_backoff_ms`
    pub initial_backoff_ms: Option<u64>,
}

//! Final assembly.

use crate::stage::{PipelineStage, Stage};
use async_trait::async_trait;
use std::sync::Arc;
use storycraft_core::{ScenarioBlueprint, SceneArtifact};
use storycraft_error::{ConfigError, PipelineError, PipelineErrorKind, StorycraftResult};
use storycraft_interface::{StitchAssembler, StitchRequest};
use storycraft_retry::RetryPolicy;
use tracing::{info, instrument};

/// Clips and narration of the successful scenes, in scene order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StitchInput {
    /// Clip URIs
    pub clips: Vec<String>,
    /// Voiceover URIs parallel to `clips`, empty where a scene has none
    pub voiceovers: Vec<String>,
    /// Shared music track
    pub music: Option<String>,
    /// Scenes in the storyboard, successful or not
    pub total_scenes: usize,
}

impl StitchInput {
    /// Collect every scene that has a clip.
    ///
    /// # Examples
    ///
    /// ```
    /// use storycraft_core::ScenarioBlueprint;
    /// use storycraft_pipeline::StitchInput;
    ///
    /// let input = StitchInput::from_blueprint(&ScenarioBlueprint::default(), None);
    /// assert!(input.clips.is_empty());
    /// ```
    pub fn from_blueprint(blueprint: &ScenarioBlueprint, music: Option<String>) -> Self {
        let mut input = Self {
            music,
            total_scenes: blueprint.scenes().len(),
            ..Self::default()
        };
        for scene in blueprint.scenes() {
            if let Some(clip) = scene.artifact(SceneArtifact::VideoClip) {
                input.clips.push(clip.to_string());
                input.voiceovers.push(
                    scene
                        .artifact(SceneArtifact::Voiceover)
                        .unwrap_or_default()
                        .to_string(),
                );
            }
        }
        input
    }
}

/// Hands the ordered clips, narration and music to the assembler.
pub struct Stitcher {
    stitch: Arc<dyn StitchAssembler>,
    retry: RetryPolicy,
    music_volume_under_speech: f64,
    fade_out_secs: f64,
}

impl Stitcher {
    /// Create the stage with the mix settings.
    pub fn new(
        stitch: Arc<dyn StitchAssembler>,
        retry: RetryPolicy,
        music_volume_under_speech: f64,
        fade_out_secs: f64,
    ) -> Self {
        Self {
            stitch,
            retry,
            music_volume_under_speech,
            fade_out_secs,
        }
    }
}

#[async_trait]
impl Stage for Stitcher {
    type Input = StitchInput;
    type Output = String;

    fn name(&self) -> PipelineStage {
        PipelineStage::Stitch
    }

    #[instrument(skip(self, input), fields(stage = %self.name(), clips = input.clips.len(), music = input.music.is_some()))]
    async fn run(&self, input: StitchInput) -> StorycraftResult<String> {
        if input.clips.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::NoVideoClips(input.total_scenes)).into());
        }

        let mut builder = StitchRequest::builder();
        builder
            .clips(input.clips)
            .voiceovers(input.voiceovers)
            .music_volume_under_speech(self.music_volume_under_speech)
            .fade_out_secs(self.fade_out_secs);
        if let Some(music) = input.music {
            builder.music(music);
        }
        let request = builder
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))?;

        let stitch = &self.stitch;
        let uri = self
            .retry
            .run("stitch", || stitch.assemble(&request))
            .await?;
        info!(uri = %uri, "Final video assembled");
        Ok(uri)
    }
}

//! Per-scene keyframe, clip and narration.

use crate::cancel::or_cancelled;
use crate::music::MusicCache;
use crate::prompts::{keyframe_prompt, video_prompt};
use crate::settings::PipelineSettings;
use crate::video::VideoPoller;
use std::sync::Arc;
use storycraft_core::{ScenarioBlueprint, Scene, SceneArtifact};
use storycraft_error::{ConfigError, GenerationError, GenerationErrorKind, StorycraftResult};
use storycraft_interface::{
    Capabilities, ImageGenerator, ImageRequest, SpeechSynthesizer, VideoGenerator, VideoRequest,
};
use storycraft_retry::RetryPolicy;
use storycraft_storage::{AssetCategory, AssetNamer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// How one scene ended.
#[derive(Debug, Clone, PartialEq, Eq, strum::EnumIs)]
pub enum SceneStatus {
    /// Keyframe and clip were produced
    Succeeded,
    /// Keyframe or clip failed, with the reason
    Failed(String),
    /// Never started because the run was aborted
    Skipped,
}

/// A processed scene, ready to be written back at its index.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOutcome {
    /// Position in the storyboard
    pub index: usize,
    /// The scene with whatever artifacts were recorded
    pub scene: Scene,
    /// How processing ended
    pub status: SceneStatus,
}

impl SceneOutcome {
    /// Outcome for a scene that was never started.
    pub fn skipped(index: usize, scene: Scene) -> Self {
        Self {
            index,
            scene,
            status: SceneStatus::Skipped,
        }
    }
}

/// Turns one storyboard scene into its artifacts.
///
/// The keyframe is generated first and seeds the clip. Narration and the shared
/// music track are requested alongside. Narration failures only log a warning;
/// keyframe or clip failures fail the scene. Artifacts a scene already carries
/// are reused rather than generated again. Every external call gives up as soon
/// as the run is cancelled.
pub struct SceneProcessor {
    image: Arc<dyn ImageGenerator>,
    video: Arc<dyn VideoGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    music: Arc<MusicCache>,
    poller: VideoPoller,
    settings: PipelineSettings,
}

impl SceneProcessor {
    /// Create a processor sharing `music` with every other scene of the run.
    pub fn new(
        capabilities: &Capabilities,
        music: Arc<MusicCache>,
        settings: PipelineSettings,
    ) -> Self {
        let poller = VideoPoller::new(
            *settings.poll_interval(),
            *settings.poll_timeout(),
            *settings.retry(),
        );
        Self {
            image: capabilities.image().clone(),
            video: capabilities.video().clone(),
            speech: capabilities.speech().clone(),
            music,
            poller,
            settings,
        }
    }

    fn retry(&self) -> &RetryPolicy {
        self.settings.retry()
    }

    /// Process one scene. Never fails: errors are reported in the outcome.
    #[instrument(skip(self, blueprint, scene, cancel), fields(scene_index = index))]
    pub async fn process(
        &self,
        blueprint: &ScenarioBlueprint,
        index: usize,
        mut scene: Scene,
        cancel: &CancellationToken,
    ) -> SceneOutcome {
        if cancel.is_cancelled() {
            return SceneOutcome::skipped(index, scene);
        }

        let (visuals, voiceover, _) = tokio::join!(
            self.visuals(blueprint, index, &scene, cancel),
            self.voiceover(blueprint, &scene, cancel),
            cancel.run_until_cancelled(self.music.track()),
        );

        let mut failure = None;
        let (keyframe, clip) = visuals;
        if let Some(uri) = keyframe {
            if let Err(e) = scene.record(index, SceneArtifact::Keyframe, uri) {
                failure = Some(e.to_string());
            }
        }
        match clip {
            Ok(uri) => {
                if let Err(e) = scene.record(index, SceneArtifact::VideoClip, uri) {
                    failure = Some(e.to_string());
                }
            }
            Err(e) => {
                warn!(error = %e, "Scene failed");
                failure = Some(e.to_string());
            }
        }
        if let Some(uri) = voiceover {
            if let Err(e) = scene.record(index, SceneArtifact::Voiceover, uri) {
                warn!(error = %e, "Voiceover not recorded");
            }
        }

        let status = match failure {
            Some(reason) => SceneStatus::Failed(reason),
            None => SceneStatus::Succeeded,
        };
        SceneOutcome {
            index,
            scene,
            status,
        }
    }

    /// Keyframe URI (if one exists) and the clip result.
    async fn visuals(
        &self,
        blueprint: &ScenarioBlueprint,
        index: usize,
        scene: &Scene,
        cancel: &CancellationToken,
    ) -> (Option<String>, StorycraftResult<String>) {
        if let Some(clip) = scene.artifact(SceneArtifact::VideoClip) {
            debug!("Scene already has a clip");
            let keyframe = scene.artifact(SceneArtifact::Keyframe).map(str::to_string);
            return (keyframe, Ok(clip.to_string()));
        }

        let keyframe = match scene.artifact(SceneArtifact::Keyframe) {
            Some(uri) => uri.to_string(),
            None => match self.keyframe(blueprint, index, scene, cancel).await {
                Ok(uri) => uri,
                Err(e) => return (None, Err(e)),
            },
        };

        if cancel.is_cancelled() {
            let cancelled = GenerationError::new(GenerationErrorKind::Cancelled("video".to_string()));
            return (Some(keyframe), Err(cancelled.into()));
        }
        let clip = self.clip(blueprint, scene, &keyframe, cancel).await;
        (Some(keyframe), clip)
    }

    async fn keyframe(
        &self,
        blueprint: &ScenarioBlueprint,
        index: usize,
        scene: &Scene,
        cancel: &CancellationToken,
    ) -> StorycraftResult<String> {
        let references: Vec<String> = scene
            .subject_names()
            .iter()
            .filter_map(|name| blueprint.character_image(name))
            .filter(|uri| !AssetNamer::is_error_uri(uri))
            .map(str::to_string)
            .collect();
        debug!(references = references.len(), "Resolved keyframe references");

        let request = ImageRequest::builder()
            .prompt(keyframe_prompt(scene))
            .reference_images(references)
            .aspect_ratio(blueprint.aspect_ratio().unwrap_or(*self.settings.aspect_ratio()))
            .category(AssetCategory::SceneKeyframes)
            .asset_name(format!("scene-{}", index + 1))
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))?;

        let image = &self.image;
        or_cancelled(
            cancel,
            "image",
            self.retry()
                .run("keyframe", || image.generate_image(&request)),
        )
        .await
    }

    async fn clip(
        &self,
        blueprint: &ScenarioBlueprint,
        scene: &Scene,
        keyframe: &str,
        cancel: &CancellationToken,
    ) -> StorycraftResult<String> {
        let request = VideoRequest::builder()
            .keyframe_uri(keyframe)
            .prompt(video_prompt(scene))
            .duration_seconds(
                blueprint
                    .duration_seconds()
                    .unwrap_or(*self.settings.duration_seconds()),
            )
            .aspect_ratio(blueprint.aspect_ratio().unwrap_or(*self.settings.aspect_ratio()))
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))?;

        self.poller
            .generate(self.video.as_ref(), &request, cancel)
            .await
    }

    /// Narration URI, `None` when the line is blank or synthesis failed.
    async fn voiceover(
        &self,
        blueprint: &ScenarioBlueprint,
        scene: &Scene,
        cancel: &CancellationToken,
    ) -> Option<String> {
        if let Some(uri) = scene.artifact(SceneArtifact::Voiceover) {
            return Some(uri.to_string());
        }
        if !scene.has_voiceover() {
            debug!("Blank voiceover, skipping narration");
            return None;
        }

        let speech = &self.speech;
        let text = scene.voiceover_text().as_str();
        let voice = self.settings.narrator_voice().as_str();
        let language = blueprint.language().code.as_str();
        let synthesis = self
            .retry()
            .run("voiceover", || speech.synthesize(text, voice, language));
        match or_cancelled(cancel, "speech", synthesis).await {
            Ok(uri) => Some(uri),
            Err(e) => {
                warn!(error = %e, "Voiceover failed, scene continues without narration");
                None
            }
        }
    }
}

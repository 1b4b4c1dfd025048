//! The pitch-to-video orchestrator.

use crate::character_sheet::CharacterSheetStage;
use crate::fanout::SceneFanOut;
use crate::music::MusicCache;
use crate::report::RunReport;
use crate::scenario::{ScenarioRequest, ScenarioStage};
use crate::scene::SceneProcessor;
use crate::settings::PipelineSettings;
use crate::stage::{PipelineStage, Stage, StageStatus};
use crate::stitch::{StitchInput, Stitcher};
use crate::storyboard::StoryboardStage;
use std::sync::Arc;
use std::time::Duration;
use storycraft_core::ScenarioBlueprint;
use storycraft_error::{PipelineError, PipelineErrorKind, StorycraftResult};
use storycraft_interface::Capabilities;
use storycraft_retry::StorycraftConfig;
use storycraft_storage::{AssetCategory, AssetNamer};
use tokio::time::{Instant, sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// How long cancelled work may take to wind down after the run timeout.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a run. Produced whether the run succeeded or not.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Final movie URI, or `{bucket}/error.mp4`
    pub final_uri: String,
    /// Latest blueprint, once the scenario stage has produced one
    pub blueprint: Option<ScenarioBlueprint>,
    /// Stage statuses, scene failures and timing
    pub report: RunReport,
}

impl PipelineOutput {
    /// Whether a real video was produced.
    pub fn is_success(&self) -> bool {
        !AssetNamer::is_error_uri(&self.final_uri)
    }
}

/// Sequences the stages: scenario, character sheets, storyboard, scene
/// fan-out and stitch.
///
/// A stage-level failure aborts every later stage (reported as skipped) and
/// yields the `error.mp4` sentinel; `run` itself never fails.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use storycraft_models::mock_capabilities;
/// use storycraft_pipeline::{Pipeline, PipelineSettings, ScenarioRequest};
/// use storycraft_storage::InMemoryAssetStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(InMemoryAssetStore::new("gs://bucket/out"));
/// let pipeline = Pipeline::new(mock_capabilities(store, 1)?, PipelineSettings::default());
/// let request = ScenarioRequest::builder()
///     .pitch("A lone astronaut discovers a glowing plant on the moon")
///     .num_scenes(1u32)
///     .build()?;
///
/// let output = pipeline.run(request).await;
/// println!("{}", output.final_uri);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    capabilities: Capabilities,
    settings: PipelineSettings,
}

struct RunState {
    report: RunReport,
    blueprint: Option<ScenarioBlueprint>,
}

impl Pipeline {
    /// Create a pipeline over a capability bundle.
    pub fn new(capabilities: Capabilities, settings: PipelineSettings) -> Self {
        Self {
            capabilities,
            settings,
        }
    }

    /// Create a pipeline with settings taken from configuration.
    pub fn from_config(capabilities: Capabilities, config: &StorycraftConfig) -> Self {
        Self::new(capabilities, PipelineSettings::from(config))
    }

    /// Settings in effect.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the whole pipeline.
    pub async fn run(&self, request: ScenarioRequest) -> PipelineOutput {
        self.run_with_cancel(request, CancellationToken::new()).await
    }

    /// Run the whole pipeline, aborting when `cancel` fires.
    ///
    /// Scenes not yet started when the token fires are skipped, calls in flight
    /// are dropped, and submitted video jobs are cancelled. Artifacts already
    /// stored stay in storage. The run timeout cancels the same way and then
    /// gives outstanding work a bounded time to wind down.
    #[instrument(skip(self, request, cancel), fields(num_scenes = request.num_scenes(), concurrency = self.settings.concurrency()))]
    pub async fn run_with_cancel(
        &self,
        request: ScenarioRequest,
        cancel: CancellationToken,
    ) -> PipelineOutput {
        let started = Instant::now();
        let token = cancel.child_token();
        let mut run = RunState {
            report: RunReport::new(),
            blueprint: None,
        };

        let result = {
            let work = self.execute(request, &token, &mut run);
            tokio::pin!(work);
            match self.settings.run_timeout() {
                Some(limit) => {
                    let finished = tokio::select! {
                        result = &mut work => Some(result),
                        _ = sleep(*limit) => None,
                    };
                    match finished {
                        Some(result) => result,
                        None => {
                            warn!(timeout_secs = limit.as_secs(), "Run timed out, cancelling outstanding work");
                            token.cancel();
                            if timeout(DRAIN_TIMEOUT, work).await.is_err() {
                                warn!(
                                    drain_secs = DRAIN_TIMEOUT.as_secs(),
                                    "Outstanding work did not wind down, abandoning it"
                                );
                            }
                            Err(PipelineError::new(PipelineErrorKind::TimedOut(limit.as_secs())).into())
                        }
                    }
                }
                None => work.await,
            }
        };

        let final_uri = match result {
            Ok(uri) => uri,
            Err(e) => {
                error!(error = %e, "Pipeline aborted");
                run.report.error = Some(e.to_string());
                run.report.fail_running();
                run.report.skip_pending();
                self.capabilities
                    .store()
                    .namer()
                    .error_uri_for(AssetCategory::FinalVideos)
            }
        };
        run.report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            final_uri = %final_uri,
            failed_scenes = run.report.failed_scenes.len(),
            partial = run.report.partial,
            duration_ms = run.report.duration_ms,
            "Pipeline finished"
        );
        PipelineOutput {
            final_uri,
            blueprint: run.blueprint,
            report: run.report,
        }
    }

    async fn execute(
        &self,
        request: ScenarioRequest,
        cancel: &CancellationToken,
        run: &mut RunState,
    ) -> StorycraftResult<String> {
        let caps = &self.capabilities;
        let retry = *self.settings.retry();
        let num_scenes = *request.num_scenes();

        let scenario = ScenarioStage::new(caps.text().clone(), retry);
        let blueprint = run_stage(&mut run.report, cancel, &scenario, request).await?;
        run.blueprint = Some(blueprint.clone());

        let sheets_stage =
            CharacterSheetStage::new(caps.image().clone(), caps.store().namer().clone(), retry);
        let sheets = run_stage(&mut run.report, cancel, &sheets_stage, blueprint).await?;
        run.report.reference_image_failures = sheets.failed;
        let blueprint = sheets.blueprint;
        run.blueprint = Some(blueprint.clone());

        let storyboard = StoryboardStage::new(caps.text().clone(), retry, num_scenes);
        let mut blueprint = run_stage(&mut run.report, cancel, &storyboard, blueprint).await?;
        run.blueprint = Some(blueprint.clone());
        if blueprint.scenes().is_empty() {
            run.report.mark(PipelineStage::Storyboard, StageStatus::Failed);
            return Err(PipelineError::new(PipelineErrorKind::NoScenes(num_scenes)).into());
        }

        let stage = PipelineStage::SceneFanOut;
        if cancel.is_cancelled() {
            return Err(PipelineError::new(PipelineErrorKind::Cancelled(stage.to_string())).into());
        }
        run.report.mark(stage, StageStatus::Running);
        let music = Arc::new(MusicCache::new(
            caps.music().clone(),
            retry,
            blueprint.music_description().clone(),
        ));
        let processor = SceneProcessor::new(caps, music.clone(), self.settings.clone());
        let outcomes = SceneFanOut::new(&processor, *self.settings.concurrency())
            .run(&blueprint, cancel)
            .await;

        run.report.record_scenes(&outcomes);
        let total = outcomes.len();
        let succeeded = outcomes.iter().filter(|o| o.status.is_succeeded()).count();
        for outcome in outcomes {
            blueprint.replace_scene(outcome.index, outcome.scene);
        }
        run.blueprint = Some(blueprint.clone());

        if cancel.is_cancelled() {
            run.report.mark(stage, StageStatus::Failed);
            return Err(PipelineError::new(PipelineErrorKind::Cancelled(stage.to_string())).into());
        }
        if succeeded == 0 {
            run.report.mark(stage, StageStatus::Failed);
            return Err(PipelineError::new(PipelineErrorKind::NoVideoClips(total)).into());
        }
        if succeeded < total {
            let partial = PipelineError::new(PipelineErrorKind::PartialFailure {
                failed: total - succeeded,
                total,
            });
            warn!(error = %partial, "Continuing with the successful scenes");
            run.report.partial = true;
        }
        run.report.mark(stage, StageStatus::Succeeded);

        let stitcher = Stitcher::new(
            caps.stitch().clone(),
            retry,
            *self.settings.music_volume_under_speech(),
            *self.settings.fade_out_secs(),
        );
        let track = cancel.run_until_cancelled(music.track()).await.flatten();
        let input = StitchInput::from_blueprint(&blueprint, track);
        run_stage(&mut run.report, cancel, &stitcher, input).await
    }
}

/// Run one stage, tracking its status.
///
/// A cancelled run does not start it, and cancellation drops it mid-flight.
async fn run_stage<S: Stage>(
    report: &mut RunReport,
    cancel: &CancellationToken,
    stage: &S,
    input: S::Input,
) -> StorycraftResult<S::Output> {
    let name = stage.name();
    if cancel.is_cancelled() {
        return Err(PipelineError::new(PipelineErrorKind::Cancelled(name.to_string())).into());
    }
    report.mark(name, StageStatus::Running);
    let result = match cancel.run_until_cancelled(stage.run(input)).await {
        Some(result) => result,
        None => Err(PipelineError::new(PipelineErrorKind::Cancelled(name.to_string())).into()),
    };
    match &result {
        Ok(_) => report.mark(name, StageStatus::Succeeded),
        Err(e) => {
            error!(stage = %name, error = %e, "Stage failed");
            report.mark(name, StageStatus::Failed);
        }
    }
    result
}

//! Pipeline run command handler.

use super::RunArgs;
use super::config::load_config;
use storycraft::{
    BlueprintDocument, JsonError, Pipeline, PipelineError, PipelineErrorKind, PipelineOverrides,
    ScenarioRequest, StorageError, StorageErrorKind, StorycraftConfig, StorycraftResult,
    ValidationError, ValidationErrorKind, mock_capabilities, open_store,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Polls the mock video generator makes a job wait before completing.
const MOCK_VIDEO_POLLS: usize = 1;

impl RunArgs {
    fn overrides(&self) -> PipelineOverrides {
        PipelineOverrides {
            num_scenes: self.scenes,
            style: self.style.clone(),
            language_name: self.language_name.clone(),
            language_code: self.language_code.clone(),
            concurrency: self.concurrency,
            run_timeout_secs: self.timeout,
            ..Default::default()
        }
    }

    fn request(&self, config: &StorycraftConfig) -> StorycraftResult<ScenarioRequest> {
        let pipeline = config.pipeline();
        ScenarioRequest::builder()
            .pitch(self.pitch.clone())
            .num_scenes(*pipeline.num_scenes())
            .style(pipeline.style().clone())
            .language(pipeline.language())
            .build()
            .map_err(|e| {
                ValidationError::new(ValidationErrorKind::MissingField(e.to_string())).into()
            })
    }
}

/// Run the pipeline for a pitch against the bundled mock capabilities.
///
/// Prints the final video URI. Ctrl-C cancels the run; scenes already
/// started are allowed to wind down and in-flight jobs are cancelled.
pub async fn run_pitch(args: RunArgs) -> StorycraftResult<()> {
    let config = load_config(args.config.as_deref())?.with_overrides(args.overrides());
    config.validate()?;

    let store = open_store(args.store, &config)?;
    let pipeline = Pipeline::from_config(mock_capabilities(store, MOCK_VIDEO_POLLS)?, &config);
    let request = args.request(&config)?;

    info!(
        pitch = %args.pitch,
        scenes = request.num_scenes(),
        store = %args.store,
        "Starting run"
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            on_interrupt.cancel();
        }
    });

    let output = pipeline.run_with_cancel(request, cancel).await;
    interrupt.abort();

    if let Some(path) = &args.output {
        match &output.blueprint {
            Some(blueprint) => {
                let json = BlueprintDocument::from(blueprint.clone()).to_json();
                tokio::fs::write(path, json).await.map_err(|e| {
                    StorageError::new(StorageErrorKind::FileWrite(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                })?;
                info!(path = %path.display(), "Wrote blueprint");
            }
            None => warn!("No blueprint was produced, nothing written"),
        }
    }

    let report = serde_json::to_string_pretty(&output.report)
        .map_err(|e| JsonError::new(format!("Failed to render run report: {}", e)))?;
    info!(report = %report, "Run finished");

    println!("{}", output.final_uri);

    if output.is_success() {
        return Ok(());
    }
    let stage = output
        .report
        .stages
        .iter()
        .find(|(_, status)| status.is_failed())
        .map(|(stage, _)| stage.to_string())
        .unwrap_or_else(|| "pipeline".to_string());
    let reason = output
        .report
        .error
        .clone()
        .unwrap_or_else(|| "unknown failure".to_string());
    error!(stage = %stage, reason = %reason, "Run failed");
    Err(PipelineError::new(PipelineErrorKind::StageFailed { stage, reason }).into())
}

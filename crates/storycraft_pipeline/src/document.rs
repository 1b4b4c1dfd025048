//! JSON-in, JSON-out runners for driving the stages one at a time.
//!
//! Every runner returns a JSON document, never an error. Malformed input and
//! stage failures become `{"error": ..., "details": ...}`. An input that is
//! already an error document is passed through unchanged so later stages halt.

use crate::scenario::{ScenarioRequest, ScenarioStage};
use crate::scene::{SceneProcessor, SceneStatus};
use crate::stage::Stage;
use storycraft_core::{
    BlueprintDocument, ErrorDocument, ScenarioBlueprint, SceneArtifact, select_scene,
};
use storycraft_error::StorycraftResult;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};

/// Run the scenario stage and render the blueprint or the failure.
pub async fn scenario_document(stage: &ScenarioStage, request: ScenarioRequest) -> String {
    BlueprintDocument::from(stage.run(request).await).to_json()
}

/// Run a blueprint-to-blueprint stage over a JSON document.
///
/// Used for the character-sheet and storyboard stages.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use storycraft_models::MockTextGenerator;
/// use storycraft_pipeline::{StoryboardStage, stage_document};
/// use storycraft_retry::RetryPolicy;
///
/// # async fn example() {
/// let stage = StoryboardStage::new(Arc::new(MockTextGenerator::new()), RetryPolicy::disabled(), 2);
/// let output = stage_document(&stage, "{not json").await;
/// assert!(output.contains("Invalid JSON input"));
/// # }
/// ```
#[instrument(skip(stage, json), fields(stage = %stage.name()))]
pub async fn stage_document<S>(stage: &S, json: &str) -> String
where
    S: Stage<Input = ScenarioBlueprint>,
    S::Output: Into<ScenarioBlueprint>,
{
    let blueprint = match BlueprintDocument::parse(json) {
        BlueprintDocument::Blueprint(blueprint) => *blueprint,
        error @ BlueprintDocument::Error(_) => {
            warn!("Input is an error document, passing it through");
            return error.to_json();
        }
    };
    let result: StorycraftResult<ScenarioBlueprint> = stage.run(blueprint).await.map(Into::into);
    BlueprintDocument::from(result).to_json()
}

/// Process one scene of a blueprint document and return the enriched document.
///
/// An index past the end selects the last scene. A failed scene yields an
/// error document carrying the reason and, when one was produced, the keyframe
/// URI so the finished work is not lost.
#[instrument(skip(processor, json))]
pub async fn scene_document(processor: &SceneProcessor, json: &str, index: usize) -> String {
    let mut blueprint = match BlueprintDocument::parse(json) {
        BlueprintDocument::Blueprint(blueprint) => *blueprint,
        error @ BlueprintDocument::Error(_) => return error.to_json(),
    };
    let Some(last) = blueprint.scenes().len().checked_sub(1) else {
        return BlueprintDocument::Error(ErrorDocument::new(
            "Scene processing failed",
            Some("blueprint has no scenes".to_string()),
        ))
        .to_json();
    };
    let index = index.min(last);
    let scene = blueprint.scenes()[index].clone();

    let outcome = processor
        .process(&blueprint, index, scene, &CancellationToken::new())
        .await;
    match outcome.status {
        SceneStatus::Succeeded => {
            blueprint.replace_scene(index, outcome.scene);
            BlueprintDocument::from(blueprint).to_json()
        }
        SceneStatus::Failed(reason) => {
            let details = match outcome.scene.artifact(SceneArtifact::Keyframe) {
                Some(keyframe) => format!("{reason} (keyframe kept at {keyframe})"),
                None => reason,
            };
            BlueprintDocument::Error(ErrorDocument::new("Scene processing failed", Some(details)))
                .to_json()
        }
        SceneStatus::Skipped => BlueprintDocument::Error(ErrorDocument::new(
            "Scene processing failed",
            Some("scene was skipped".to_string()),
        ))
        .to_json(),
    }
}

/// Select one scene's prompts and narration as JSON.
///
/// Never fails: malformed input, error documents and blueprints without scenes
/// all yield empty prompts and an empty voiceover.
///
/// # Examples
///
/// ```
/// use storycraft_pipeline::select_scene_document;
///
/// let output = select_scene_document("garbage", 0);
/// let value: serde_json::Value = serde_json::from_str(&output).unwrap();
/// assert_eq!(value["imagePrompt"], serde_json::json!({}));
/// assert_eq!(value["voiceoverText"], "");
/// ```
pub fn select_scene_document(json: &str, index: usize) -> String {
    let blueprint = match BlueprintDocument::parse(json) {
        BlueprintDocument::Blueprint(blueprint) => *blueprint,
        BlueprintDocument::Error(doc) => {
            warn!(error = %doc.error, "No blueprint to select from");
            ScenarioBlueprint::default()
        }
    };
    let selection = select_scene(&blueprint, index);
    serde_json::to_string_pretty(&selection).unwrap_or_else(|_| {
        r#"{"imagePrompt": {}, "videoPrompt": {}, "voiceoverText": ""}"#.to_string()
    })
}

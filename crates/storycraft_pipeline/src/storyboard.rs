//! Scenario to storyboard scenes.

use crate::extraction::{extract_json, parse_json};
use crate::prompts::scenes_prompt;
use crate::stage::{PipelineStage, Stage};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use storycraft_core::{ScenarioBlueprint, Scene};
use storycraft_error::{GenerationError, StorycraftResult};
use storycraft_interface::TextGenerator;
use storycraft_retry::RetryPolicy;
use tracing::{info, instrument, warn};

/// Writes exactly `num_scenes` scenes into the blueprint.
///
/// The stage fails closed: when the generator cannot be reached, its answer
/// cannot be parsed, or it yields fewer scenes than requested, the blueprint
/// comes back with an empty scene list. Extra scenes are truncated. Names in
/// `charactersPresent` that are missing from the roster are dropped.
pub struct StoryboardStage {
    text: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
    num_scenes: u32,
}

impl StoryboardStage {
    /// Create the stage for a scene count.
    pub fn new(text: Arc<dyn TextGenerator>, retry: RetryPolicy, num_scenes: u32) -> Self {
        Self {
            text,
            retry,
            num_scenes,
        }
    }

    async fn generate_scenes(&self, blueprint: &ScenarioBlueprint) -> StorycraftResult<Vec<Scene>> {
        let prompt = scenes_prompt(blueprint, self.num_scenes);
        let text = &self.text;
        let response = self
            .retry
            .run("storyboard", || text.generate(&prompt))
            .await?;

        let value: Value = parse_json(&extract_json(&response)?)?;
        let scenes = match value {
            Value::Object(mut fields) => match fields.remove("scenes") {
                Some(Value::Array(scenes)) => scenes,
                _ => {
                    return Err(GenerationError::unparseable(
                        "text",
                        "response has no `scenes` list",
                    )
                    .into());
                }
            },
            Value::Array(scenes) => scenes,
            _ => {
                return Err(
                    GenerationError::unparseable("text", "response is not a JSON object").into(),
                );
            }
        };

        let wanted = self.num_scenes as usize;
        let mut parsed = Vec::with_capacity(wanted);
        for (index, scene) in scenes.into_iter().enumerate() {
            match serde_json::from_value::<Scene>(scene) {
                Ok(scene) => parsed.push(scene),
                Err(e) => warn!(index, error = %e, "Dropping malformed scene"),
            }
        }

        if parsed.len() < wanted {
            return Err(GenerationError::unparseable(
                "text",
                format!("expected {} scenes, got {}", wanted, parsed.len()),
            )
            .into());
        }
        if parsed.len() > wanted {
            warn!(got = parsed.len(), wanted, "Truncating extra scenes");
            parsed.truncate(wanted);
        }
        Ok(parsed)
    }
}

#[async_trait]
impl Stage for StoryboardStage {
    type Input = ScenarioBlueprint;
    type Output = ScenarioBlueprint;

    fn name(&self) -> PipelineStage {
        PipelineStage::Storyboard
    }

    #[instrument(skip(self, blueprint), fields(stage = %self.name(), num_scenes = self.num_scenes))]
    async fn run(&self, mut blueprint: ScenarioBlueprint) -> StorycraftResult<ScenarioBlueprint> {
        match self.generate_scenes(&blueprint).await {
            Ok(scenes) => blueprint.set_scenes(scenes),
            Err(e) => {
                warn!(error = %e, "Storyboard failed, leaving scenes empty");
                blueprint.set_scenes(Vec::new());
                return Ok(blueprint);
            }
        }

        for (scene, name) in blueprint.retain_known_characters() {
            warn!(scene, name = %name, "Dropping unknown character from scene");
        }

        info!(scenes = blueprint.scenes().len(), "Storyboard generated");
        Ok(blueprint)
    }
}

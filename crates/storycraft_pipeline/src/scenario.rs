//! Pitch to scenario.

use crate::extraction::{extract_json, parse_json};
use crate::prompts::scenario_prompt;
use crate::stage::{PipelineStage, Stage};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use storycraft_core::{Language, ScenarioBlueprint};
use storycraft_error::{GenerationError, StorycraftResult, ValidationError, ValidationErrorKind};
use storycraft_interface::TextGenerator;
use storycraft_retry::RetryPolicy;
use tracing::{debug, info, instrument, warn};

/// Props beyond this count are dropped.
pub const MAX_PROPS: usize = 2;

/// What a run is asked to produce.
///
/// # Examples
///
/// ```
/// use storycraft_pipeline::ScenarioRequest;
///
/// let request = ScenarioRequest::builder()
///     .pitch("A lone astronaut discovers a glowing plant on the moon")
///     .num_scenes(1u32)
///     .build()
///     .unwrap();
/// assert_eq!(request.style(), "Cinematic");
/// assert_eq!(request.language().code, "en-US");
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ScenarioRequest {
    /// Story pitch
    pitch: String,
    /// Number of storyboard scenes
    #[builder(default = "5")]
    num_scenes: u32,
    /// Visual style
    #[builder(default = "\"Cinematic\".to_string()")]
    style: String,
    /// Narration language
    #[builder(default)]
    language: Language,
}

impl ScenarioRequest {
    /// Start building a request.
    pub fn builder() -> ScenarioRequestBuilder {
        ScenarioRequestBuilder::default()
    }

    /// Check the pitch and scene count.
    ///
    /// # Errors
    ///
    /// Returns `InputValidationError` for a blank pitch or zero scenes.
    pub fn validate(&self) -> StorycraftResult<()> {
        if self.pitch.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyPitch).into());
        }
        if self.num_scenes == 0 {
            return Err(
                ValidationError::new(ValidationErrorKind::InvalidSceneCount(self.num_scenes))
                    .into(),
            );
        }
        Ok(())
    }
}

/// Produces the initial blueprint from a pitch.
pub struct ScenarioStage {
    text: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
}

impl ScenarioStage {
    /// Create the stage.
    pub fn new(text: Arc<dyn TextGenerator>, retry: RetryPolicy) -> Self {
        Self { text, retry }
    }
}

#[async_trait]
impl Stage for ScenarioStage {
    type Input = ScenarioRequest;
    type Output = ScenarioBlueprint;

    fn name(&self) -> PipelineStage {
        PipelineStage::Scenario
    }

    #[instrument(skip(self, request), fields(stage = %self.name(), model = self.text.model_name(), num_scenes = request.num_scenes))]
    async fn run(&self, request: ScenarioRequest) -> StorycraftResult<ScenarioBlueprint> {
        request.validate()?;

        let prompt = scenario_prompt(&request.pitch, &request.style, &request.language);
        let text = &self.text;
        let response = self
            .retry
            .run("scenario", || text.generate(&prompt))
            .await?;
        debug!(response_len = response.len(), "Scenario response received");

        let value: Value = parse_json(&extract_json(&response)?)?;
        if !value.is_object() {
            return Err(GenerationError::unparseable("text", "scenario is not a JSON object").into());
        }
        let mut blueprint: ScenarioBlueprint = serde_json::from_value(value)
            .map_err(|e| GenerationError::unparseable("text", e.to_string()))?;

        blueprint.apply_request(request.pitch, request.style, request.language);
        let dropped = blueprint.truncate_props(MAX_PROPS);
        if dropped > 0 {
            warn!(dropped, max = MAX_PROPS, "Scenario listed too many props, extra props dropped");
        }

        info!(
            characters = blueprint.characters().len(),
            settings = blueprint.settings().len(),
            props = blueprint.props().len(),
            genre = %blueprint.genre(),
            mood = %blueprint.mood(),
            "Scenario generated"
        );
        Ok(blueprint)
    }
}

//! Reference images for characters, settings and props.

use crate::prompts::reference_image_prompt;
use crate::stage::{PipelineStage, Stage};
use async_trait::async_trait;
use std::sync::Arc;
use storycraft_core::{RosterKind, ScenarioBlueprint};
use storycraft_error::{ConfigError, StorycraftResult};
use storycraft_interface::{ImageGenerator, ImageRequest};
use storycraft_retry::RetryPolicy;
use storycraft_storage::{AssetCategory, AssetNamer};
use strum::IntoEnumIterator;
use tracing::{info, instrument, warn};

/// Blueprint with every roster entry carrying an `imageUri`.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSheets {
    /// The enriched blueprint
    pub blueprint: ScenarioBlueprint,
    /// Entries that received the error sentinel instead of an image
    pub failed: usize,
}

impl From<CharacterSheets> for ScenarioBlueprint {
    fn from(sheets: CharacterSheets) -> Self {
        sheets.blueprint
    }
}

/// Generates one reference image per roster entry.
///
/// Entries are processed characters first, then settings, then props. A
/// failed entry gets `{bucket}/error.png` and the stage carries on.
pub struct CharacterSheetStage {
    image: Arc<dyn ImageGenerator>,
    namer: AssetNamer,
    retry: RetryPolicy,
}

impl CharacterSheetStage {
    /// Create the stage.
    pub fn new(image: Arc<dyn ImageGenerator>, namer: AssetNamer, retry: RetryPolicy) -> Self {
        Self {
            image,
            namer,
            retry,
        }
    }

    async fn reference_image(&self, request: &ImageRequest) -> StorycraftResult<String> {
        let image = &self.image;
        self.retry
            .run("reference_image", || image.generate_image(request))
            .await
    }
}

#[async_trait]
impl Stage for CharacterSheetStage {
    type Input = ScenarioBlueprint;
    type Output = CharacterSheets;

    fn name(&self) -> PipelineStage {
        PipelineStage::CharacterSheets
    }

    #[instrument(skip(self, blueprint), fields(stage = %self.name()))]
    async fn run(&self, mut blueprint: ScenarioBlueprint) -> StorycraftResult<CharacterSheets> {
        let style = blueprint.style().clone();
        let mut failed = 0;
        let mut total = 0;

        for kind in RosterKind::iter() {
            for index in 0..blueprint.roster(kind).len() {
                let entry = &blueprint.roster(kind)[index];
                let request = ImageRequest::builder()
                    .prompt(reference_image_prompt(
                        &style,
                        kind.shot_type(),
                        entry.description(),
                    ))
                    .aspect_ratio(kind.aspect_ratio())
                    .category(AssetCategory::ReferenceImages)
                    .asset_name(entry.slug())
                    .build();
                let name = entry.name().clone();
                total += 1;

                let result = match request {
                    Ok(request) => self.reference_image(&request).await,
                    Err(e) => Err(ConfigError::new(e.to_string()).into()),
                };
                let uri = match result {
                    Ok(uri) => uri,
                    Err(e) => {
                        warn!(%kind, name = %name, error = %e, "Reference image failed, using error sentinel");
                        failed += 1;
                        self.namer.error_uri_for(AssetCategory::ReferenceImages)
                    }
                };
                blueprint.roster_mut(kind)[index].set_image_uri(uri);
            }
        }

        info!(total, failed, "Reference images generated");
        Ok(CharacterSheets { blueprint, failed })
    }
}

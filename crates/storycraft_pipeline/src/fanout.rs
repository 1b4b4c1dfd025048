//! Bounded per-scene fan-out with ordered fan-in.

use crate::scene::{SceneOutcome, SceneProcessor};
use futures::stream::{self, StreamExt};
use storycraft_core::ScenarioBlueprint;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Runs the scene processor over every scene with at most `concurrency`
/// scenes in flight.
///
/// Outcomes come back in scene order regardless of completion order. Once
/// `cancel` fires, scenes that have not started are reported as skipped.
pub struct SceneFanOut<'a> {
    processor: &'a SceneProcessor,
    concurrency: usize,
}

impl<'a> SceneFanOut<'a> {
    /// Create a fan-out. A concurrency of 0 is treated as 1.
    pub fn new(processor: &'a SceneProcessor, concurrency: usize) -> Self {
        Self {
            processor,
            concurrency: concurrency.max(1),
        }
    }

    /// Process every scene of `blueprint`.
    #[instrument(skip(self, blueprint, cancel), fields(scenes = blueprint.scenes().len(), concurrency = self.concurrency))]
    pub async fn run(
        &self,
        blueprint: &ScenarioBlueprint,
        cancel: &CancellationToken,
    ) -> Vec<SceneOutcome> {
        let processor = self.processor;
        let outcomes: Vec<SceneOutcome> = stream::iter(blueprint.scenes().iter().cloned().enumerate())
            .map(|(index, scene)| async move {
                if cancel.is_cancelled() {
                    SceneOutcome::skipped(index, scene)
                } else {
                    processor.process(blueprint, index, scene, cancel).await
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let succeeded = outcomes.iter().filter(|o| o.status.is_succeeded()).count();
        info!(succeeded, total = outcomes.len(), "Scene fan-out finished");
        outcomes
    }
}

//! The stage abstraction and stage bookkeeping types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storycraft_error::StorycraftResult;

/// One step of the pipeline.
///
/// Stages consume their input by value and return a new, enriched value.
/// The orchestrator composes them with direct calls.
#[async_trait]
pub trait Stage: Send + Sync {
    /// What the stage consumes
    type Input: Send;
    /// What the stage produces
    type Output: Send;

    /// Stage name used in logs and reports.
    fn name(&self) -> PipelineStage;

    /// Run the stage.
    async fn run(&self, input: Self::Input) -> StorycraftResult<Self::Output>;
}

/// The orchestrated stages, in execution order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Pitch to scenario
    #[display("scenario")]
    Scenario,
    /// Reference images for the roster
    #[display("character_sheets")]
    CharacterSheets,
    /// Scenario to scenes
    #[display("storyboard")]
    Storyboard,
    /// Per-scene keyframe, clip and narration
    #[display("scene_fan_out")]
    SceneFanOut,
    /// Final assembly
    #[display("stitch")]
    Stitch,
}

/// Status of one stage within a run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIs,
)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Not started yet
    #[default]
    #[display("pending")]
    Pending,
    /// In progress
    #[display("running")]
    Running,
    /// Finished successfully
    #[display("succeeded")]
    Succeeded,
    /// Finished with a fatal error
    #[display("failed")]
    Failed,
    /// Never started because an earlier stage failed
    #[display("skipped")]
    Skipped,
}

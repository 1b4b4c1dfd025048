//! End-to-end run report.

use crate::scene::{SceneOutcome, SceneStatus};
use crate::stage::{PipelineStage, StageStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// A scene that did not make it into the final video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneFailure {
    /// Position in the storyboard
    pub index: usize,
    /// Why it failed
    pub reason: String,
}

/// What happened during a run.
///
/// # Examples
///
/// ```
/// use storycraft_pipeline::{PipelineStage, RunReport, StageStatus};
///
/// let report = RunReport::default();
/// assert_eq!(report.status(PipelineStage::Stitch), StageStatus::Pending);
/// assert!(!report.partial);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Status per stage, in execution order
    pub stages: BTreeMap<PipelineStage, StageStatus>,
    /// The fatal error that aborted the run, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Roster entries that got the error sentinel
    pub reference_image_failures: usize,
    /// Scenes that failed
    pub failed_scenes: Vec<SceneFailure>,
    /// Scenes never started because the run was aborted
    pub skipped_scenes: Vec<usize>,
    /// Some scenes failed but a video was still produced
    pub partial: bool,
    /// Wall-clock run time
    pub duration_ms: u64,
}

impl RunReport {
    /// Report with every stage pending.
    pub fn new() -> Self {
        Self {
            stages: PipelineStage::iter()
                .map(|stage| (stage, StageStatus::Pending))
                .collect(),
            ..Self::default()
        }
    }

    /// Current status of a stage.
    pub fn status(&self, stage: PipelineStage) -> StageStatus {
        self.stages.get(&stage).copied().unwrap_or_default()
    }

    /// Set a stage's status.
    pub fn mark(&mut self, stage: PipelineStage, status: StageStatus) {
        self.stages.insert(stage, status);
    }

    /// Mark every stage that never started as skipped.
    pub fn skip_pending(&mut self) {
        for status in self.stages.values_mut() {
            if status.is_pending() {
                *status = StageStatus::Skipped;
            }
        }
    }

    /// Mark every stage that was cut off mid-flight as failed.
    pub fn fail_running(&mut self) {
        for status in self.stages.values_mut() {
            if status.is_running() {
                *status = StageStatus::Failed;
            }
        }
    }

    /// Record scene failures and skips from a fan-out.
    pub fn record_scenes(&mut self, outcomes: &[SceneOutcome]) {
        for outcome in outcomes {
            match &outcome.status {
                SceneStatus::Succeeded => {}
                SceneStatus::Failed(reason) => self.failed_scenes.push(SceneFailure {
                    index: outcome.index,
                    reason: reason.clone(),
                }),
                SceneStatus::Skipped => self.skipped_scenes.push(outcome.index),
            }
        }
    }

    /// Whether every stage succeeded.
    pub fn succeeded(&self) -> bool {
        self.stages.values().all(StageStatus::is_succeeded)
    }
}

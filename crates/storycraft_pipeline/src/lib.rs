//! Stage orchestration for StoryCraft.
//!
//! This crate turns a pitch into a finished video by threading a
//! [`ScenarioBlueprint`](storycraft_core::ScenarioBlueprint) through five
//! stages:
//!
//! 1. [`ScenarioStage`]: pitch to scenario, roster, genre, mood and music
//! 2. [`CharacterSheetStage`]: a reference image per roster entry
//! 3. [`StoryboardStage`]: exactly N scenes
//! 4. [`SceneFanOut`]: keyframe, clip and narration per scene, `K` at a time
//! 5. [`Stitcher`]: ordered clips, narration and music into one movie
//!
//! [`Pipeline`] runs them in order and always returns a [`PipelineOutput`];
//! failures show up as the `error.mp4` sentinel and in the [`RunReport`].
//! The [`document`] runners drive single stages over JSON documents.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod character_sheet;
pub mod document;
mod extraction;
mod fanout;
mod music;
mod orchestrator;
pub mod prompts;
mod report;
mod scenario;
mod scene;
mod settings;
mod stage;
mod stitch;
mod storyboard;
mod video;

pub use character_sheet::{CharacterSheetStage, CharacterSheets};
pub use document::{scenario_document, scene_document, select_scene_document, stage_document};
pub use extraction::{extract_json, parse_json};
pub use fanout::SceneFanOut;
pub use music::MusicCache;
pub use orchestrator::{Pipeline, PipelineOutput};
pub use report::{RunReport, SceneFailure};
pub use scenario::{MAX_PROPS, ScenarioRequest, ScenarioRequestBuilder, ScenarioStage};
pub use scene::{SceneOutcome, SceneProcessor, SceneStatus};
pub use settings::{PipelineSettings, PipelineSettingsBuilder};
pub use stage::{PipelineStage, Stage, StageStatus};
pub use stitch::{StitchInput, Stitcher};
pub use storyboard::StoryboardStage;
pub use video::VideoPoller;

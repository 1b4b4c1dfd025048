//! Core data types for the StoryCraft video pipeline.
//!
//! This crate provides the [`ScenarioBlueprint`], the single document threaded
//! through every pipeline stage, together with its [`Scene`] and [`RosterEntry`]
//! parts and the JSON document envelope used at stage boundaries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aspect;
mod blueprint;
mod document;
mod language;
mod roster;
mod scene;
mod selection;
mod text;

pub use aspect::{AspectRatio, VideoSettings, DEFAULT_DURATION_SECONDS};
pub use blueprint::{ScenarioBlueprint, ScenarioBlueprintBuilder};
pub use document::{BlueprintDocument, ErrorDocument};
pub use language::Language;
pub use roster::{RosterEntry, RosterEntryBuilder, RosterKind, ShotType};
pub use scene::{Scene, SceneArtifact, SceneBuilder};
pub use selection::{select_scene, SceneSelection};

//! Picking one scene's prompts out of a blueprint.

use crate::ScenarioBlueprint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prompts and narration of a single scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSelection {
    /// Keyframe prompt
    pub image_prompt: Value,
    /// Clip prompt
    pub video_prompt: Value,
    /// Narrator line
    pub voiceover_text: String,
}

impl Default for SceneSelection {
    fn default() -> Self {
        Self {
            image_prompt: Value::Object(Map::new()),
            video_prompt: Value::Object(Map::new()),
            voiceover_text: String::new(),
        }
    }
}

/// Select a scene by index.
///
/// An index past the end selects the last scene. A blueprint without scenes
/// yields empty prompts and an empty voiceover; this never fails.
///
/// # Examples
///
/// ```
/// use storycraft_core::{select_scene, ScenarioBlueprint};
///
/// let selection = select_scene(&ScenarioBlueprint::default(), 4);
/// assert_eq!(selection.image_prompt, serde_json::json!({}));
/// assert!(selection.voiceover_text.is_empty());
/// ```
pub fn select_scene(blueprint: &ScenarioBlueprint, index: usize) -> SceneSelection {
    let scenes = blueprint.scenes();
    let Some(last) = scenes.len().checked_sub(1) else {
        tracing::debug!("No scenes to select from");
        return SceneSelection::default();
    };
    let scene = &scenes[index.min(last)];
    SceneSelection {
        image_prompt: scene.image_prompt().clone(),
        video_prompt: scene.video_prompt().clone(),
        voiceover_text: scene.voiceover_text().clone(),
    }
}

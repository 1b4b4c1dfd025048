//! The scenario blueprint document.

use crate::text::text_or_lines;
use crate::{
    AspectRatio, DEFAULT_DURATION_SECONDS, Language, RosterEntry, RosterKind, Scene,
    VideoSettings,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storycraft_error::{StorycraftResult, ValidationError, ValidationErrorKind};

/// The evolving document threaded through every pipeline stage.
///
/// Each stage takes a blueprint by value and returns an enriched copy. Field
/// names serialize in camelCase; generator field names `scenario` and `music`
/// are accepted as input aliases.
///
/// # Examples
///
/// ```
/// use storycraft_core::{RosterEntry, ScenarioBlueprintBuilder};
///
/// let blueprint = ScenarioBlueprintBuilder::default()
///     .pitch("A lone astronaut discovers a glowing plant on the moon")
///     .style("Cinematic")
///     .characters(vec![RosterEntry::new("Eva", "An astronaut")])
///     .build()
///     .unwrap();
///
/// assert_eq!(blueprint.characters().len(), 1);
/// assert!(blueprint.scenes().is_empty());
/// assert_eq!(blueprint.video_settings().duration_seconds, 8);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into), default)]
pub struct ScenarioBlueprint {
    /// Original pitch
    #[serde(default)]
    pitch: String,
    /// Visual style applied to every image
    #[serde(default)]
    style: String,
    /// Narration language
    #[serde(default)]
    language: Language,
    /// Story text
    #[serde(default, alias = "scenario", deserialize_with = "text_or_lines")]
    scenario_text: String,
    /// Genre picked by the scenario generator
    #[serde(default)]
    genre: String,
    /// Mood picked by the scenario generator
    #[serde(default)]
    mood: String,
    /// Prompt for the background music
    #[serde(default, alias = "music", deserialize_with = "text_or_lines")]
    music_description: String,
    /// Characters
    #[serde(default)]
    characters: Vec<RosterEntry>,
    /// Settings
    #[serde(default)]
    settings: Vec<RosterEntry>,
    /// Props
    #[serde(default)]
    props: Vec<RosterEntry>,
    /// Storyboard scenes
    #[serde(default)]
    scenes: Vec<Scene>,
    /// Clip aspect ratio, defaults to 16:9
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    aspect_ratio: Option<AspectRatio>,
    /// Clip duration in seconds, defaults to 8
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    duration_seconds: Option<u32>,
    /// Unrecognized keys, preserved verbatim
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl ScenarioBlueprint {
    /// Entries of one roster.
    pub fn roster(&self, kind: RosterKind) -> &[RosterEntry] {
        match kind {
            RosterKind::Character => &self.characters,
            RosterKind::Setting => &self.settings,
            RosterKind::Prop => &self.props,
        }
    }

    /// Mutable entries of one roster. Entries can be enriched but not added or removed.
    pub fn roster_mut(&mut self, kind: RosterKind) -> &mut [RosterEntry] {
        match kind {
            RosterKind::Character => &mut self.characters,
            RosterKind::Setting => &mut self.settings,
            RosterKind::Prop => &mut self.props,
        }
    }

    /// Reference image of a named character, if one was generated.
    pub fn character_image(&self, name: &str) -> Option<&str> {
        self.characters
            .iter()
            .find(|entry| entry.name() == name)
            .and_then(|entry| entry.image_uri().as_deref())
    }

    /// Whether a character of this name exists.
    pub fn has_character(&self, name: &str) -> bool {
        self.characters.iter().any(|entry| entry.name() == name)
    }

    /// Aspect ratio and duration for clip generation, with defaults applied.
    pub fn video_settings(&self) -> VideoSettings {
        VideoSettings {
            aspect_ratio: self.aspect_ratio.unwrap_or_default(),
            duration_seconds: self.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS),
        }
    }

    /// Stamp the request fields owned by the scenario stage.
    ///
    /// Any scenes a generator volunteered alongside the scenario are dropped;
    /// only the storyboard stage writes `scenes`.
    pub fn apply_request(
        &mut self,
        pitch: impl Into<String>,
        style: impl Into<String>,
        language: Language,
    ) {
        self.pitch = pitch.into();
        self.style = style.into();
        self.language = language;
        self.scenes.clear();
    }

    /// Replace the whole scene list.
    pub fn set_scenes(&mut self, scenes: Vec<Scene>) {
        self.scenes = scenes;
    }

    /// Write a processed scene back at its index. Out-of-range indexes are ignored.
    pub fn replace_scene(&mut self, index: usize, scene: Scene) {
        if let Some(slot) = self.scenes.get_mut(index) {
            *slot = scene;
        }
    }

    /// Mutable access to scenes for per-scene enrichment.
    pub fn scenes_mut(&mut self) -> &mut [Scene] {
        &mut self.scenes
    }

    /// Truncate props to at most `max` entries, returning how many were dropped.
    pub fn truncate_props(&mut self, max: usize) -> usize {
        let dropped = self.props.len().saturating_sub(max);
        self.props.truncate(max);
        dropped
    }

    /// `(scene index, name)` pairs for `charactersPresent` names missing from the roster.
    pub fn unknown_characters(&self) -> Vec<(usize, String)> {
        let mut unknown = Vec::new();
        for (index, scene) in self.scenes.iter().enumerate() {
            for name in scene.characters_present() {
                if !self.has_character(name) {
                    unknown.push((index, name.clone()));
                }
            }
        }
        unknown
    }

    /// Drop unknown names from every scene's `charactersPresent`, returning what was dropped.
    pub fn retain_known_characters(&mut self) -> Vec<(usize, String)> {
        let known: Vec<String> = self
            .characters
            .iter()
            .map(|entry| entry.name().clone())
            .collect();
        let mut dropped = Vec::new();
        for (index, scene) in self.scenes.iter_mut().enumerate() {
            let names = scene.retain_characters(|name| known.iter().any(|k| k == name));
            dropped.extend(names.into_iter().map(|name| (index, name)));
        }
        dropped
    }

    /// Check the document invariants.
    ///
    /// # Errors
    ///
    /// Returns `InputValidationError` for an empty pitch or a scene that
    /// references a character missing from the roster.
    pub fn validate(&self) -> StorycraftResult<()> {
        if self.pitch.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyPitch).into());
        }
        if let Some((scene, name)) = self.unknown_characters().into_iter().next() {
            return Err(
                ValidationError::new(ValidationErrorKind::UnknownCharacter { scene, name }).into(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with(names: &[&str]) -> Scene {
        let json = serde_json::json!({ "charactersPresent": names });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_unknown_characters_are_reported_and_dropped() {
        let mut blueprint = ScenarioBlueprintBuilder::default()
            .pitch("pitch")
            .characters(vec![RosterEntry::new("Eva", "astronaut")])
            .scenes(vec![scene_with(&["Eva", "Ghost"]), scene_with(&["Eva"])])
            .build()
            .unwrap();

        assert!(blueprint.validate().is_err());
        assert_eq!(blueprint.unknown_characters(), vec![(0, "Ghost".to_string())]);

        let dropped = blueprint.retain_known_characters();
        assert_eq!(dropped, vec![(0, "Ghost".to_string())]);
        assert_eq!(blueprint.scenes()[0].characters_present(), &vec!["Eva".to_string()]);
        assert!(blueprint.validate().is_ok());
    }

    #[test]
    fn test_truncate_props() {
        let mut blueprint = ScenarioBlueprintBuilder::default()
            .props(vec![
                RosterEntry::new("a", ""),
                RosterEntry::new("b", ""),
                RosterEntry::new("c", ""),
            ])
            .build()
            .unwrap();
        assert_eq!(blueprint.truncate_props(2), 1);
        assert_eq!(blueprint.props().len(), 2);
        assert_eq!(blueprint.truncate_props(2), 0);
    }

    #[test]
    fn test_replace_scene_out_of_range_is_ignored() {
        let mut blueprint = ScenarioBlueprint::default();
        blueprint.replace_scene(3, Scene::default());
        assert!(blueprint.scenes().is_empty());
    }
}

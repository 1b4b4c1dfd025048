//! Storyboard scenes.

use crate::text::{dedup_names, unique_names};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storycraft_error::{StorycraftResult, ValidationError, ValidationErrorKind};

/// Artifacts produced per scene, each written exactly once.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum SceneArtifact {
    /// Keyframe image seeding the clip
    #[display("keyframeUri")]
    Keyframe,
    /// Generated video clip
    #[display("videoClipUri")]
    VideoClip,
    /// Synthesized narration
    #[display("voiceoverUri")]
    Voiceover,
}

/// One storyboard unit.
///
/// Prompts are kept as structured JSON objects exactly as the storyboard
/// generator produced them. Artifact URIs are forward-only: see [`Scene::record`].
///
/// # Examples
///
/// ```
/// use storycraft_core::Scene;
///
/// let json = r#"{
///     "imagePrompt": {"Subject": [{"name": "Eva"}]},
///     "videoPrompt": {"Action": "Eva reaches out"},
///     "description": "Eva touches the plant.",
///     "voiceover": "A spark of life.",
///     "charactersPresent": ["Eva", "Eva"]
/// }"#;
/// let scene: Scene = serde_json::from_str(json).unwrap();
///
/// assert_eq!(scene.voiceover_text(), "A spark of life.");
/// assert_eq!(scene.characters_present(), &vec!["Eva".to_string()]);
/// assert_eq!(scene.subject_names(), vec!["Eva".to_string()]);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into), default)]
pub struct Scene {
    /// Structured prompt for the keyframe image
    #[serde(default = "empty_object")]
    image_prompt: Value,
    /// Structured prompt for the clip (action, camera motion, ambient audio)
    #[serde(default = "empty_object")]
    video_prompt: Value,
    /// What happens in the scene
    #[serde(default)]
    description: String,
    /// Narrator line, may be empty
    #[serde(default, alias = "voiceover")]
    voiceover_text: String,
    /// Names of characters visible in the scene
    #[serde(default, deserialize_with = "unique_names")]
    characters_present: Vec<String>,
    /// Keyframe image URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(setter(skip))]
    keyframe_uri: Option<String>,
    /// Video clip URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(setter(skip))]
    video_clip_uri: Option<String>,
    /// Voiceover URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(setter(skip))]
    voiceover_uri: Option<String>,
    /// Unrecognized keys, preserved verbatim
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            image_prompt: empty_object(),
            video_prompt: empty_object(),
            description: String::new(),
            voiceover_text: String::new(),
            characters_present: Vec::new(),
            keyframe_uri: None,
            video_clip_uri: None,
            voiceover_uri: None,
            extra: Map::new(),
        }
    }
}

impl Scene {
    /// URI recorded for an artifact, if any.
    pub fn artifact(&self, artifact: SceneArtifact) -> Option<&str> {
        match artifact {
            SceneArtifact::Keyframe => self.keyframe_uri.as_deref(),
            SceneArtifact::VideoClip => self.video_clip_uri.as_deref(),
            SceneArtifact::Voiceover => self.voiceover_uri.as_deref(),
        }
    }

    /// Record an artifact URI.
    ///
    /// Artifacts are forward-only: recording the same URI twice is a no-op,
    /// recording a different URI over an existing one is rejected.
    ///
    /// # Errors
    ///
    /// Returns `InputValidationError` if the field already holds a different URI.
    pub fn record(
        &mut self,
        scene_index: usize,
        artifact: SceneArtifact,
        uri: impl Into<String>,
    ) -> StorycraftResult<()> {
        let uri = uri.into();
        let slot = match artifact {
            SceneArtifact::Keyframe => &mut self.keyframe_uri,
            SceneArtifact::VideoClip => &mut self.video_clip_uri,
            SceneArtifact::Voiceover => &mut self.voiceover_uri,
        };
        match slot {
            Some(existing) if *existing == uri => Ok(()),
            Some(_) => Err(ValidationError::new(ValidationErrorKind::FieldAlreadySet {
                scene: scene_index,
                field: artifact.to_string(),
            })
            .into()),
            None => {
                *slot = Some(uri);
                Ok(())
            }
        }
    }

    /// Whether the narrator line has any non-whitespace content.
    pub fn has_voiceover(&self) -> bool {
        !self.voiceover_text.trim().is_empty()
    }

    /// Character names listed under `imagePrompt.Subject`.
    ///
    /// Subjects may be objects with a `name` key or plain strings.
    pub fn subject_names(&self) -> Vec<String> {
        let subjects = self
            .image_prompt
            .get("Subject")
            .or_else(|| self.image_prompt.get("subject"));
        let Some(Value::Array(subjects)) = subjects else {
            return Vec::new();
        };
        dedup_names(subjects.iter().filter_map(|subject| match subject {
            Value::String(name) => Some(name.clone()),
            Value::Object(fields) => fields
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }))
    }

    /// Remove names from `charactersPresent` that fail the predicate, returning the dropped names.
    pub fn retain_characters(&mut self, mut known: impl FnMut(&str) -> bool) -> Vec<String> {
        let (kept, dropped): (Vec<String>, Vec<String>) = self
            .characters_present
            .drain(..)
            .partition(|name| known(name));
        self.characters_present = kept;
        dropped
    }

    /// Text field of the video prompt, empty when absent.
    pub fn video_prompt_field(&self, key: &str) -> String {
        match self.video_prompt.get(key) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

//! Characters, settings and props.

use crate::AspectRatio;
use crate::text::text_or_lines;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which roster a [`RosterEntry`] belongs to.
///
/// Iteration order (`strum::IntoEnumIterator`) is the fixed processing order:
/// characters, then settings, then props.
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
pub enum RosterKind {
    /// Story characters
    #[display("characters")]
    Character,
    /// Locations
    #[display("settings")]
    Setting,
    /// Important objects
    #[display("props")]
    Prop,
}

impl RosterKind {
    /// Shot type used for the reference image of this kind.
    pub fn shot_type(&self) -> ShotType {
        match self {
            RosterKind::Character => ShotType::Medium,
            RosterKind::Setting => ShotType::Wide,
            RosterKind::Prop => ShotType::Close,
        }
    }

    /// Aspect ratio used for the reference image of this kind.
    pub fn aspect_ratio(&self) -> AspectRatio {
        match self {
            RosterKind::Setting => AspectRatio::Landscape,
            RosterKind::Character | RosterKind::Prop => AspectRatio::Square,
        }
    }
}

/// Framing of a reference image.
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
)]
#[serde(rename_all = "lowercase")]
pub enum ShotType {
    /// Medium shot (characters)
    #[display("medium")]
    Medium,
    /// Wide shot (settings)
    #[display("wide")]
    Wide,
    /// Close shot (props)
    #[display("close")]
    Close,
}

/// One character, setting or prop.
///
/// Keys the pipeline does not know about are kept in `extra` and written back
/// unchanged, so enrichment only ever adds `imageUri`.
///
/// # Examples
///
/// ```
/// use storycraft_core::RosterEntry;
///
/// let json = r#"{"name": "Dr. Eva Rostova", "description": ["Late 30s.", "White spacesuit."], "age": 38}"#;
/// let entry: RosterEntry = serde_json::from_str(json).unwrap();
///
/// assert_eq!(entry.description(), "Late 30s. White spacesuit.");
/// assert!(entry.image_uri().is_none());
/// assert_eq!(entry.extra()["age"], 38);
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
pub struct RosterEntry {
    /// Display name, also the key scenes use to reference this entry
    #[serde(default)]
    name: String,
    /// Visual description
    #[serde(default, deserialize_with = "text_or_lines")]
    description: String,
    /// Voice description (characters only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    voice: Option<String>,
    /// Reference image URI, written by the character-sheet stage
    #[serde(default, alias = "imageGcsUri", skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    image_uri: Option<String>,
    /// Unrecognized keys, preserved verbatim
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RosterEntry {
    /// Create an entry with a name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Set the reference image URI.
    pub fn set_image_uri(&mut self, uri: impl Into<String>) {
        self.image_uri = Some(uri.into());
    }

    /// File-name friendly form of the entry name ("Dr. Eva Rostova" → "dr.-eva-rostova").
    pub fn slug(&self) -> String {
        let slug = self.name.trim().to_lowercase().replace(' ', "-");
        if slug.is_empty() {
            "unnamed".to_string()
        } else {
            slug
        }
    }
}

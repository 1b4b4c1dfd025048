//! Narration language.

use serde::{Deserialize, Serialize};

/// Language used for the scenario text and voiceover.
///
/// # Examples
///
/// ```
/// use storycraft_core::Language;
///
/// let lang = Language::default();
/// assert_eq!(lang.name, "English");
/// assert_eq!(lang.code, "en-US");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    /// Display name (e.g. "English")
    #[serde(default = "default_name")]
    pub name: String,
    /// BCP-47 code (e.g. "en-US")
    #[serde(default = "default_code")]
    pub code: String,
}

fn default_name() -> String {
    "English".to_string()
}

fn default_code() -> String {
    "en-US".to_string()
}

impl Language {
    /// Create a language from name and code.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self {
            name: default_name(),
            code: default_code(),
        }
    }
}

//! JSON envelope exchanged at stage boundaries.
//!
//! A stage boundary carries either a blueprint or an error document. Errors
//! travel as data so that every downstream stage can detect them and halt.

use crate::ScenarioBlueprint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storycraft_error::{StorycraftError, StorycraftResult, ValidationError, ValidationErrorKind};

/// `{"error": ..., "details": ...}` as emitted by a failed stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    /// Short description
    pub error: String,
    /// Further information (usually the underlying error message)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorDocument {
    /// Create an error document.
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }

    /// Render a pipeline error as a document.
    pub fn from_error(err: &StorycraftError) -> Self {
        Self::new(err.category(), Some(err.to_string()))
    }
}

/// Either a blueprint or an error document.
///
/// # Examples
///
/// ```
/// use storycraft_core::BlueprintDocument;
///
/// let doc = BlueprintDocument::parse("not json");
/// assert!(doc.is_error());
/// assert!(doc.to_json().contains("Invalid JSON input"));
///
/// let doc = BlueprintDocument::parse(r#"{"pitch": "A robot learns to paint"}"#);
/// assert!(!doc.is_error());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum BlueprintDocument {
    /// An upstream failure
    Error(ErrorDocument),
    /// A well-formed blueprint
    Blueprint(Box<ScenarioBlueprint>),
}

impl BlueprintDocument {
    /// Parse JSON text. Never fails: malformed input becomes an error document.
    pub fn parse(json: &str) -> Self {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Document is not valid JSON");
                return Self::Error(ErrorDocument::new("Invalid JSON input", Some(e.to_string())));
            }
        };
        Self::from_value(value)
    }

    /// Interpret a JSON value. An object with an `error` key is an error document.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::Error(ErrorDocument::new(
                "Invalid JSON input",
                Some("expected a JSON object".to_string()),
            ));
        }
        if value.get("error").is_some() {
            return match serde_json::from_value::<ErrorDocument>(value.clone()) {
                Ok(doc) => Self::Error(doc),
                Err(_) => Self::Error(ErrorDocument::new(value["error"].to_string(), None)),
            };
        }
        match serde_json::from_value::<ScenarioBlueprint>(value) {
            Ok(blueprint) => Self::Blueprint(Box::new(blueprint)),
            Err(e) => {
                tracing::warn!(error = %e, "Document does not match the blueprint schema");
                Self::Error(ErrorDocument::new("Invalid blueprint", Some(e.to_string())))
            }
        }
    }

    /// Whether this is an error document.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> String {
        let rendered = match self {
            Self::Error(doc) => serde_json::to_string_pretty(doc),
            Self::Blueprint(blueprint) => serde_json::to_string_pretty(blueprint),
        };
        rendered.unwrap_or_else(|e| {
            format!(
                r#"{{"error": "Serialization failed", "details": {}}}"#,
                Value::String(e.to_string())
            )
        })
    }

    /// Unwrap the blueprint.
    ///
    /// # Errors
    ///
    /// Returns `InputValidationError` carrying the upstream message for error documents.
    pub fn into_result(self) -> StorycraftResult<ScenarioBlueprint> {
        match self {
            Self::Blueprint(blueprint) => Ok(*blueprint),
            Self::Error(doc) => {
                let message = match doc.details {
                    Some(details) => format!("{}: {}", doc.error, details),
                    None => doc.error,
                };
                Err(ValidationError::new(ValidationErrorKind::UpstreamErrorDocument(message)).into())
            }
        }
    }
}

impl From<StorycraftResult<ScenarioBlueprint>> for BlueprintDocument {
    fn from(result: StorycraftResult<ScenarioBlueprint>) -> Self {
        match result {
            Ok(blueprint) => Self::Blueprint(Box::new(blueprint)),
            Err(e) => Self::Error(ErrorDocument::from_error(&e)),
        }
    }
}

impl From<ScenarioBlueprint> for BlueprintDocument {
    fn from(blueprint: ScenarioBlueprint) -> Self {
        Self::Blueprint(Box::new(blueprint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_document_passes_through() {
        let doc = BlueprintDocument::parse(r#"{"error": "Scenario failed", "details": "boom"}"#);
        assert_eq!(
            doc,
            BlueprintDocument::Error(ErrorDocument::new("Scenario failed", Some("boom".into())))
        );
        let err = doc.into_result().unwrap_err();
        assert_eq!(err.category(), "InputValidationError");
        assert!(err.to_string().contains("Scenario failed: boom"));
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(BlueprintDocument::parse("[1, 2]").is_error());
        assert!(BlueprintDocument::parse("\"text\"").is_error());
    }

    #[test]
    fn test_failed_result_renders_category() {
        let err: StorycraftError = ValidationError::new(ValidationErrorKind::EmptyPitch).into();
        let doc = BlueprintDocument::from(Err::<ScenarioBlueprint, _>(err));
        let json: Value = serde_json::from_str(&doc.to_json()).unwrap();
        assert_eq!(json["error"], "InputValidationError");
        assert!(json["details"].as_str().unwrap().contains("Pitch must not be empty"));
    }
}

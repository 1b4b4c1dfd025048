//! Input validation error types.

/// Malformed or missing input conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Pitch is empty or whitespace
    #[display("Pitch must not be empty")]
    EmptyPitch,
    /// Scene count outside the accepted range
    #[display("Scene count must be at least 1, got {}", _0)]
    InvalidSceneCount(u32),
    /// Required field missing from an input document
    #[display("Missing required field: {}", _0)]
    MissingField(String),
    /// Input document could not be parsed
    #[display("Malformed document: {}", _0)]
    MalformedDocument(String),
    /// Input document is an upstream error document
    #[display("Upstream stage reported an error: {}", _0)]
    UpstreamErrorDocument(String),
    /// A scene references a character that is not in the roster
    #[display("Scene {} references unknown character '{}'", scene, name)]
    UnknownCharacter {
        /// Scene index
        scene: usize,
        /// Character name
        name: String,
    },
    /// A forward-only field was written twice
    #[display("Scene {} field '{}' is already set", scene, field)]
    FieldAlreadySet {
        /// Scene index
        scene: usize,
        /// Wire name of the field
        field: String,
    },
}

/// Input validation error with location tracking.
///
/// # Examples
///
/// ```
/// use storycraft_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::InvalidSceneCount(0));
/// assert!(format!("{}", err).contains("at least 1"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Input Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific validation failure
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, JsonError, PipelineError, RetryableError, StorageError,
    ValidationError,
};

/// Every error condition the StoryCraft crates can report.
///
/// # Examples
///
/// ```
/// use storycraft_error::{ConfigError, StorycraftError};
///
/// let err: StorycraftError = ConfigError::new("bad bucket").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StorycraftErrorKind {
    /// Malformed or missing input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// External capability failure
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Stage-level pipeline failure
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Asset storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// StoryCraft error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storycraft_error::{StorycraftErrorKind, StorycraftResult, ValidationError, ValidationErrorKind};
///
/// fn might_fail() -> StorycraftResult<()> {
///     Err(ValidationError::new(ValidationErrorKind::EmptyPitch))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), StorycraftErrorKind::Validation(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("StoryCraft Error: {}", _0)]
pub struct StorycraftError(Box<StorycraftErrorKind>);

impl StorycraftError {
    /// Create a new error from a kind.
    pub fn new(kind: StorycraftErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorycraftErrorKind {
        &self.0
    }

    /// Short machine-readable category used in error documents.
    pub fn category(&self) -> &'static str {
        match self.kind() {
            StorycraftErrorKind::Validation(_) => "InputValidationError",
            StorycraftErrorKind::Generation(_) => "UpstreamGenerationError",
            StorycraftErrorKind::Pipeline(e) if !e.kind.is_fatal() => "PartialFailure",
            StorycraftErrorKind::Pipeline(_) => "FatalPipelineError",
            StorycraftErrorKind::Storage(_) => "StorageError",
            StorycraftErrorKind::Config(_) => "ConfigError",
            StorycraftErrorKind::Json(_) => "JsonError",
        }
    }
}

// Generic From implementation for any type that converts to StorycraftErrorKind
impl<T> From<T> for StorycraftError
where
    T: Into<StorycraftErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for StorycraftError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            StorycraftErrorKind::Generation(e) => e.is_retryable(),
            StorycraftErrorKind::Storage(e) => e.kind.is_retryable(),
            _ => false,
        }
    }

    fn retry_strategy_params(&self) -> Option<(u64, usize, u64)> {
        match self.kind() {
            StorycraftErrorKind::Generation(e) => e.retry_strategy_params(),
            _ => None,
        }
    }
}

/// Result type for StoryCraft operations.
pub type StorycraftResult<T> = std::result::Result<T, StorycraftError>;

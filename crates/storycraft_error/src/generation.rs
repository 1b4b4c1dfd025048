//! Upstream generation error types and retry classification.

/// Failure conditions reported by an external generation capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Request could not be completed (connection reset, upstream unavailable)
    #[display("{} request failed: {}", capability, message)]
    Request {
        /// Capability name (e.g. "text", "image")
        capability: String,
        /// Error message
        message: String,
    },
    /// Upstream returned an HTTP-like status code
    #[display("{} returned HTTP {}: {}", capability, status_code, message)]
    Http {
        /// Capability name
        capability: String,
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Upstream content could not be parsed as the expected schema
    #[display("{} returned unparseable content: {}", capability, message)]
    Unparseable {
        /// Capability name
        capability: String,
        /// Parse failure description
        message: String,
    },
    /// Upstream refused the request (policy, invalid prompt)
    #[display("{} rejected the request: {}", capability, message)]
    Rejected {
        /// Capability name
        capability: String,
        /// Rejection reason
        message: String,
    },
    /// Long-running job finished in a failed state
    #[display("{} job failed: {}", capability, message)]
    JobFailed {
        /// Capability name
        capability: String,
        /// Failure reason reported by the job
        message: String,
    },
    /// Long-running job did not finish within its time budget
    #[display("{} timed out after {}s", capability, seconds)]
    Timeout {
        /// Capability name
        capability: String,
        /// Budget that elapsed
        seconds: u64,
    },
    /// Request was cancelled before completion
    #[display("{} request cancelled", _0)]
    Cancelled(String),
}

impl GenerationErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            GenerationErrorKind::Request { .. } | GenerationErrorKind::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `Some((initial_backoff_ms, max_retries, max_delay_secs))` when the
    /// error calls for a strategy other than the configured default.
    pub fn retry_strategy_params(&self) -> Option<(u64, usize, u64)> {
        match self {
            GenerationErrorKind::Http { status_code, .. } => match *status_code {
                429 => Some((5000, 3, 40)),
                503 => Some((2000, 5, 60)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Upstream generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use storycraft_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Unparseable {
///     capability: "text".to_string(),
///     message: "missing field `scenes`".to_string(),
/// });
/// assert!(format!("{}", err).contains("unparseable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a transient request failure.
    #[track_caller]
    pub fn request(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Request {
            capability: capability.into(),
            message: message.into(),
        })
    }

    /// Shorthand for an unparseable response.
    #[track_caller]
    pub fn unparseable(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Unparseable {
            capability: capability.into(),
            message: message.into(),
        })
    }
}

/// Trait for errors that support retry logic.
///
/// Transient failures (rate limiting, overloaded upstream, dropped connections)
/// report `true` from [`is_retryable`](RetryableError::is_retryable); permanent
/// failures (unparseable content, rejected prompts, invalid input) report `false`
/// and surface immediately.
///
/// # Examples
///
/// ```
/// use storycraft_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let err = GenerationError::new(GenerationErrorKind::Http {
///     capability: "video".to_string(),
///     status_code: 429,
///     message: "Resource exhausted".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// assert_eq!(err.retry_strategy_params(), Some((5000, 3, 40)));
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Error-specific strategy as `(initial_backoff_ms, max_retries, max_delay_secs)`.
    ///
    /// `None` means the caller's configured strategy applies.
    fn retry_strategy_params(&self) -> Option<(u64, usize, u64)> {
        None
    }
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> Option<(u64, usize, u64)> {
        self.kind.retry_strategy_params()
    }
}

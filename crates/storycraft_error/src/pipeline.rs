//! Pipeline-level error types.

/// Stage-level failures that abort a pipeline run, plus the partial-failure report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Storyboard produced no usable scenes
    #[display("Storyboard produced no scenes (requested {})", _0)]
    NoScenes(u32),
    /// Every scene failed, nothing to stitch
    #[display("No video clips to stitch: all {} scenes failed", _0)]
    NoVideoClips(usize),
    /// A stage failed and the pipeline cannot continue
    #[display("Stage '{}' failed: {}", stage, reason)]
    StageFailed {
        /// Stage name
        stage: String,
        /// Failure description
        reason: String,
    },
    /// Run was cancelled before completion
    #[display("Pipeline cancelled during stage '{}'", _0)]
    Cancelled(String),
    /// Run exceeded its time budget
    #[display("Pipeline timed out after {}s", _0)]
    TimedOut(u64),
    /// Some scenes failed but at least one succeeded
    #[display("{} of {} scenes failed", failed, total)]
    PartialFailure {
        /// Number of failed scenes
        failed: usize,
        /// Number of scenes attempted
        total: usize,
    },
}

impl PipelineErrorKind {
    /// Whether this condition aborts the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PipelineErrorKind::PartialFailure { .. })
    }
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use storycraft_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::NoVideoClips(3));
/// assert!(err.kind.is_fatal());
/// assert!(format!("{}", err).contains("all 3 scenes failed"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

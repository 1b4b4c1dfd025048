//! Error types for the StoryCraft pipeline.
//!
//! This crate provides the foundation error types used throughout the StoryCraft workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The pipeline taxonomy maps onto these types as follows:
//!
//! | Taxonomy                  | Type                                      |
//! |---------------------------|-------------------------------------------|
//! | `InputValidationError`    | [`ValidationError`]                       |
//! | `UpstreamGenerationError` | [`GenerationError`]                       |
//! | `PartialFailure`          | [`PipelineErrorKind::PartialFailure`]     |
//! | `FatalPipelineError`      | [`PipelineError`] (all other kinds)       |
//!
//! # Examples
//!
//! ```
//! use storycraft_error::{StorycraftResult, ValidationError, ValidationErrorKind};
//!
//! fn check_pitch(pitch: &str) -> StorycraftResult<()> {
//!     if pitch.trim().is_empty() {
//!         Err(ValidationError::new(ValidationErrorKind::EmptyPitch))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_pitch("").is_err());
//! assert!(check_pitch("A lone astronaut").is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod json;
mod pipeline;
mod storage;
mod validation;

pub use config::ConfigError;
pub use error::{StorycraftError, StorycraftErrorKind, StorycraftResult};
pub use generation::{GenerationError, GenerationErrorKind, RetryableError};
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};

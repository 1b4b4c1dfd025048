//! Trait definitions for the external generation capabilities.
//!
//! Every capability returns URIs of assets it has already persisted; the
//! pipeline never handles media bytes directly.

use crate::{ImageRequest, StitchRequest, VideoJob, VideoJobStatus, VideoRequest};
use async_trait::async_trait;
use storycraft_error::StorycraftResult;

/// Free-form text generation (scenario and storyboard).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a prompt.
    async fn generate(&self, prompt: &str) -> StorycraftResult<String>;

    /// Model identifier used in logs.
    fn model_name(&self) -> &str;
}

/// Image generation for reference sheets and keyframes.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image and return its URI.
    async fn generate_image(&self, request: &ImageRequest) -> StorycraftResult<String>;
}

/// Long-running video clip generation.
///
/// A job is submitted once and then polled until it completes or fails.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Start a clip generation job.
    async fn submit(&self, request: &VideoRequest) -> StorycraftResult<VideoJob>;

    /// Report the current job state.
    async fn poll(&self, job: &VideoJob) -> StorycraftResult<VideoJobStatus>;

    /// Abandon a job. Best effort: the default does nothing.
    async fn cancel(&self, job: &VideoJob) -> StorycraftResult<()> {
        let _ = job;
        Ok(())
    }
}

/// Text-to-speech narration.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with a voice and language, returning the audio URI.
    async fn synthesize(&self, text: &str, voice: &str, language_code: &str)
    -> StorycraftResult<String>;
}

/// Background music generation.
#[async_trait]
pub trait MusicGenerator: Send + Sync {
    /// Generate a music track from a description, returning its URI.
    async fn generate_music(&self, prompt: &str) -> StorycraftResult<String>;
}

/// Final audio mix and clip concatenation.
#[async_trait]
pub trait StitchAssembler: Send + Sync {
    /// Mix narration against music, concatenate clips in order, attach the
    /// audio with a fade-out and return the final movie URI.
    async fn assemble(&self, request: &StitchRequest) -> StorycraftResult<String>;
}

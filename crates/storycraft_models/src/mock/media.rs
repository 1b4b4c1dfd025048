//! Placeholder image, speech, music and stitch capabilities.
//!
//! Each one writes a small text payload describing the request into the asset
//! store, so the URIs they return point at real, distinct assets.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storycraft_error::{GenerationError, StorycraftResult};
use storycraft_interface::{
    ImageGenerator, ImageRequest, MusicGenerator, SpeechSynthesizer, StitchAssembler,
    StitchRequest,
};
use storycraft_storage::{AssetCategory, AssetStore};

/// Image generator storing a description of each request as the image.
pub struct MockImageGenerator {
    store: Arc<dyn AssetStore>,
    calls: AtomicUsize,
}

impl MockImageGenerator {
    /// Create a generator writing into `store`.
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of images generated so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    #[tracing::instrument(skip(self, request), fields(category = %request.category(), asset = ?request.asset_name()))]
    async fn generate_image(&self, request: &ImageRequest) -> StorycraftResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.prompt().trim().is_empty() {
            return Err(GenerationError::unparseable("image", "empty prompt").into());
        }
        let payload = format!(
            "PNG placeholder\nname: {}\naspect: {}\nreferences: {}\n\n{}",
            request.asset_name().as_deref().unwrap_or("-"),
            request.aspect_ratio(),
            request.reference_images().join(", "),
            request.prompt()
        );
        self.store.store(payload.as_bytes(), *request.category()).await
    }
}

/// Speech synthesizer storing the narration text as audio.
pub struct MockSpeechSynthesizer {
    store: Arc<dyn AssetStore>,
    calls: AtomicUsize,
}

impl MockSpeechSynthesizer {
    /// Create a synthesizer writing into `store`.
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of narrations synthesized so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        language_code: &str,
    ) -> StorycraftResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let payload = format!("MP3 placeholder\nvoice: {voice}\nlanguage: {language_code}\n\n{text}");
        self.store
            .store(payload.as_bytes(), AssetCategory::Voiceovers)
            .await
    }
}

/// Music generator storing the prompt as the track.
pub struct MockMusicGenerator {
    store: Arc<dyn AssetStore>,
    calls: AtomicUsize,
}

impl MockMusicGenerator {
    /// Create a generator writing into `store`.
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of tracks generated so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MusicGenerator for MockMusicGenerator {
    #[tracing::instrument(skip(self, prompt))]
    async fn generate_music(&self, prompt: &str) -> StorycraftResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let payload = format!("MP3 placeholder\n\n{prompt}");
        self.store.store(payload.as_bytes(), AssetCategory::Music).await
    }
}

/// Assembler storing the serialized stitch request as the final movie.
pub struct MockStitchAssembler {
    store: Arc<dyn AssetStore>,
    last_request: tokio::sync::Mutex<Option<StitchRequest>>,
}

impl MockStitchAssembler {
    /// Create an assembler writing into `store`.
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            last_request: tokio::sync::Mutex::new(None),
        }
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<StitchRequest> {
        self.last_request.lock().await.clone()
    }
}

#[async_trait]
impl StitchAssembler for MockStitchAssembler {
    #[tracing::instrument(skip(self, request), fields(clips = request.clips().len()))]
    async fn assemble(&self, request: &StitchRequest) -> StorycraftResult<String> {
        if request.clips().is_empty() {
            return Err(GenerationError::request("stitch", "no clips to concatenate").into());
        }
        *self.last_request.lock().await = Some(request.clone());
        let manifest = serde_json::to_vec_pretty(request)
            .map_err(|e| GenerationError::request("stitch", e.to_string()))?;
        self.store.store(&manifest, AssetCategory::FinalVideos).await
    }
}

//! Test utilities for pipeline tests.
//!
//! A [`Harness`] wires the mock capabilities around an in-memory store and
//! keeps handles to them so tests can inspect call counts and requests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use storycraft_error::{GenerationError, GenerationErrorKind, StorycraftResult};
use storycraft_interface::{
    Capabilities, ImageGenerator, ImageRequest, TextGenerator, VideoGenerator, VideoJob,
    VideoJobStatus, VideoRequest,
};
use storycraft_models::{
    MockImageGenerator, MockMusicGenerator, MockSpeechSynthesizer, MockStitchAssembler,
    MockTextGenerator, MockVideoGenerator,
};
use storycraft_pipeline::{Pipeline, PipelineSettings, ScenarioRequest};
use storycraft_retry::RetryPolicy;
use storycraft_storage::{AssetCategory, InMemoryAssetStore};
use tokio::sync::Mutex;

pub const BUCKET: &str = "gs://storycraft-test/out";
pub const PITCH: &str = "A lone astronaut discovers a glowing plant on the moon";

/// Mock capabilities plus handles for inspection.
pub struct Harness {
    pub store: Arc<InMemoryAssetStore>,
    pub text: Arc<dyn TextGenerator>,
    pub image: Arc<dyn ImageGenerator>,
    pub video: Arc<dyn VideoGenerator>,
    pub speech: Arc<MockSpeechSynthesizer>,
    pub music: Arc<MockMusicGenerator>,
    pub stitch: Arc<MockStitchAssembler>,
}

impl Harness {
    /// Every capability mocked, video jobs completing after one pending poll.
    pub fn new() -> Self {
        let store = Arc::new(InMemoryAssetStore::new(BUCKET));
        Self {
            text: Arc::new(MockTextGenerator::new()),
            image: Arc::new(MockImageGenerator::new(store.clone())),
            video: Arc::new(MockVideoGenerator::new(store.clone(), 1)),
            speech: Arc::new(MockSpeechSynthesizer::new(store.clone())),
            music: Arc::new(MockMusicGenerator::new(store.clone())),
            stitch: Arc::new(MockStitchAssembler::new(store.clone())),
            store,
        }
    }

    pub fn with_text(mut self, text: Arc<dyn TextGenerator>) -> Self {
        self.text = text;
        self
    }

    pub fn with_image(mut self, image: Arc<dyn ImageGenerator>) -> Self {
        self.image = image;
        self
    }

    pub fn with_video(mut self, video: Arc<dyn VideoGenerator>) -> Self {
        self.video = video;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::builder()
            .text(self.text.clone())
            .image(self.image.clone())
            .video(self.video.clone())
            .speech(self.speech.clone())
            .music(self.music.clone())
            .stitch(self.stitch.clone())
            .store(self.store.clone())
            .build()
            .expect("capabilities")
    }

    pub fn pipeline(&self, settings: PipelineSettings) -> Pipeline {
        Pipeline::new(self.capabilities(), settings)
    }
}

/// Fast settings: no retries, millisecond polling.
pub fn fast_settings() -> PipelineSettings {
    PipelineSettings::builder()
        .retry(RetryPolicy::disabled())
        .poll_interval(Duration::from_millis(1))
        .poll_timeout(Duration::from_secs(5))
        .build()
        .expect("settings")
}

pub fn request(num_scenes: u32) -> ScenarioRequest {
    ScenarioRequest::builder()
        .pitch(PITCH)
        .num_scenes(num_scenes)
        .build()
        .expect("request")
}

fn rejected(capability: &str, message: &str) -> GenerationError {
    GenerationError::new(GenerationErrorKind::Rejected {
        capability: capability.to_string(),
        message: message.to_string(),
    })
}

/// Video generator rejecting clips whose prompt contains a marker.
pub struct SelectiveVideo {
    inner: MockVideoGenerator,
    fail_marker: String,
}

impl SelectiveVideo {
    pub fn new(store: Arc<InMemoryAssetStore>, fail_marker: &str) -> Self {
        Self {
            inner: MockVideoGenerator::new(store, 0),
            fail_marker: fail_marker.to_string(),
        }
    }
}

#[async_trait]
impl VideoGenerator for SelectiveVideo {
    async fn submit(&self, request: &VideoRequest) -> StorycraftResult<VideoJob> {
        if request.prompt().contains(&self.fail_marker) {
            return Err(rejected("video", "prompt blocked").into());
        }
        self.inner.submit(request).await
    }

    async fn poll(&self, job: &VideoJob) -> StorycraftResult<VideoJobStatus> {
        self.inner.poll(job).await
    }
}

/// Video generator whose jobs always fail.
pub struct FailingVideo;

#[async_trait]
impl VideoGenerator for FailingVideo {
    async fn submit(&self, _request: &VideoRequest) -> StorycraftResult<VideoJob> {
        Ok(VideoJob::new("operations/doomed"))
    }

    async fn poll(&self, _job: &VideoJob) -> StorycraftResult<VideoJobStatus> {
        Ok(VideoJobStatus::Failed("safety filter".to_string()))
    }
}

/// Video generator that takes longer for earlier scenes, so completion order
/// is the reverse of scene order.
pub struct StaggeredVideo {
    inner: MockVideoGenerator,
    delays: Vec<(String, Duration)>,
}

impl StaggeredVideo {
    pub fn new(store: Arc<InMemoryAssetStore>, delays: Vec<(&str, Duration)>) -> Self {
        Self {
            inner: MockVideoGenerator::new(store, 0),
            delays: delays
                .into_iter()
                .map(|(marker, delay)| (marker.to_string(), delay))
                .collect(),
        }
    }
}

#[async_trait]
impl VideoGenerator for StaggeredVideo {
    async fn submit(&self, request: &VideoRequest) -> StorycraftResult<VideoJob> {
        if let Some((_, delay)) = self
            .delays
            .iter()
            .find(|(marker, _)| request.prompt().contains(marker.as_str()))
        {
            tokio::time::sleep(*delay).await;
        }
        self.inner.submit(request).await
    }

    async fn poll(&self, job: &VideoJob) -> StorycraftResult<VideoJobStatus> {
        self.inner.poll(job).await
    }
}

/// Image generator recording requests and failing reference images.
pub struct RecordingImage {
    inner: MockImageGenerator,
    fail_references: bool,
    pub requests: Mutex<Vec<ImageRequest>>,
}

impl RecordingImage {
    pub fn new(store: Arc<InMemoryAssetStore>, fail_references: bool) -> Self {
        Self {
            inner: MockImageGenerator::new(store),
            fail_references,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn requests_in(&self, category: AssetCategory) -> Vec<ImageRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| *r.category() == category)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ImageGenerator for RecordingImage {
    async fn generate_image(&self, request: &ImageRequest) -> StorycraftResult<String> {
        self.requests.lock().await.push(request.clone());
        if self.fail_references && *request.category() == AssetCategory::ReferenceImages {
            return Err(rejected("image", "reference images unavailable").into());
        }
        self.inner.generate_image(request).await
    }
}

/// Text generator answering with a canned response for storyboard prompts.
pub struct CannedStoryboard {
    inner: MockTextGenerator,
    storyboard: String,
}

impl CannedStoryboard {
    pub fn new(storyboard: impl Into<String>) -> Self {
        Self {
            inner: MockTextGenerator::new(),
            storyboard: storyboard.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for CannedStoryboard {
    async fn generate(&self, prompt: &str) -> StorycraftResult<String> {
        if prompt.contains("<scenario>") {
            return Ok(self.storyboard.clone());
        }
        self.inner.generate(prompt).await
    }

    fn model_name(&self) -> &str {
        "canned-storyboard"
    }
}

/// Text generator that never answers within any test's patience.
pub struct StalledText;

#[async_trait]
impl TextGenerator for StalledText {
    async fn generate(&self, _prompt: &str) -> StorycraftResult<String> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("{}".to_string())
    }

    fn model_name(&self) -> &str {
        "stalled-text"
    }
}

/// Text generator that keeps reporting a transient network failure.
pub struct FlakyText;

#[async_trait]
impl TextGenerator for FlakyText {
    async fn generate(&self, _prompt: &str) -> StorycraftResult<String> {
        Err(GenerationError::request("text", "connection reset").into())
    }

    fn model_name(&self) -> &str {
        "flaky-text"
    }
}

/// Image generator that serves reference images but stalls on keyframes.
pub struct StalledKeyframes {
    inner: MockImageGenerator,
}

impl StalledKeyframes {
    pub fn new(store: Arc<InMemoryAssetStore>) -> Self {
        Self {
            inner: MockImageGenerator::new(store),
        }
    }
}

#[async_trait]
impl ImageGenerator for StalledKeyframes {
    async fn generate_image(&self, request: &ImageRequest) -> StorycraftResult<String> {
        if *request.category() == AssetCategory::SceneKeyframes {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.inner.generate_image(request).await
    }
}

//! Long-running video job simulation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use storycraft_error::{GenerationError, GenerationErrorKind, StorycraftResult};
use storycraft_interface::{VideoGenerator, VideoJob, VideoJobStatus, VideoRequest};
use storycraft_storage::{AssetCategory, AssetStore};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug)]
struct PendingJob {
    request: VideoRequest,
    polls_remaining: usize,
}

/// Video generator whose jobs complete after a fixed number of polls.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use storycraft_interface::{VideoGenerator, VideoJobStatus, VideoRequest};
/// use storycraft_models::MockVideoGenerator;
/// use storycraft_storage::InMemoryAssetStore;
///
/// # async fn example() -> storycraft_error::StorycraftResult<()> {
/// let video = MockVideoGenerator::new(Arc::new(InMemoryAssetStore::new("gs://b")), 1);
/// let request = VideoRequest::builder()
///     .keyframe_uri("gs://b/scene_keyframes/k.png")
///     .prompt("Action: walk")
///     .duration_seconds(8u32)
///     .build()
///     .unwrap();
///
/// let job = video.submit(&request).await?;
/// assert_eq!(video.poll(&job).await?, VideoJobStatus::Pending);
/// assert!(video.poll(&job).await?.is_completed());
/// # Ok(())
/// # }
/// ```
pub struct MockVideoGenerator {
    store: Arc<dyn AssetStore>,
    polls_before_completion: usize,
    jobs: Mutex<HashMap<String, PendingJob>>,
    cancelled: Mutex<Vec<String>>,
}

impl MockVideoGenerator {
    /// Create a generator whose jobs report `Pending` for `polls_before_completion` polls.
    pub fn new(store: Arc<dyn AssetStore>, polls_before_completion: usize) -> Self {
        Self {
            store,
            polls_before_completion,
            jobs: Mutex::new(HashMap::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    /// Identifiers of jobs cancelled so far.
    pub async fn cancelled_jobs(&self) -> Vec<String> {
        self.cancelled.lock().await.clone()
    }
}

#[async_trait]
impl VideoGenerator for MockVideoGenerator {
    #[tracing::instrument(skip(self, request), fields(keyframe = %request.keyframe_uri()))]
    async fn submit(&self, request: &VideoRequest) -> StorycraftResult<VideoJob> {
        if *request.duration_seconds() == 0 {
            return Err(GenerationError::new(GenerationErrorKind::Rejected {
                capability: "video".to_string(),
                message: "duration must be positive".to_string(),
            })
            .into());
        }
        let job = VideoJob::new(format!("operations/{}", Uuid::new_v4()));
        self.jobs.lock().await.insert(
            job.id.clone(),
            PendingJob {
                request: request.clone(),
                polls_remaining: self.polls_before_completion,
            },
        );
        tracing::debug!(job = %job, "Submitted video job");
        Ok(job)
    }

    #[tracing::instrument(skip(self), fields(job = %job))]
    async fn poll(&self, job: &VideoJob) -> StorycraftResult<VideoJobStatus> {
        let mut jobs = self.jobs.lock().await;
        let Some(pending) = jobs.get_mut(&job.id) else {
            return Ok(VideoJobStatus::Failed(format!("unknown job {}", job.id)));
        };
        if pending.polls_remaining > 0 {
            pending.polls_remaining -= 1;
            return Ok(VideoJobStatus::Pending);
        }

        let request = &pending.request;
        let payload = format!(
            "MP4 placeholder\nkeyframe: {}\naspect: {}\nduration: {}s\n\n{}",
            request.keyframe_uri(),
            request.aspect_ratio(),
            request.duration_seconds(),
            request.prompt()
        );
        let uri = self
            .store
            .store(payload.as_bytes(), AssetCategory::VideoClips)
            .await?;
        jobs.remove(&job.id);
        Ok(VideoJobStatus::Completed(uri))
    }

    async fn cancel(&self, job: &VideoJob) -> StorycraftResult<()> {
        self.jobs.lock().await.remove(&job.id);
        self.cancelled.lock().await.push(job.id.clone());
        tracing::debug!(job = %job, "Cancelled video job");
        Ok(())
    }
}

//! Waiting on long-running video jobs.

use crate::cancel::or_cancelled;
use std::time::Duration;
use storycraft_error::{GenerationError, GenerationErrorKind, StorycraftError, StorycraftResult};
use storycraft_interface::{VideoGenerator, VideoJob, VideoJobStatus, VideoRequest};
use storycraft_retry::RetryPolicy;
use tokio::time::{Instant, sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Upper bound on the best-effort cancel of an abandoned job.
const ABANDON_TIMEOUT: Duration = Duration::from_secs(10);

/// Submits a clip job and polls it to completion.
///
/// Polling stops on completion, job failure, timeout or cancellation. On
/// timeout and cancellation the job is cancelled on a best-effort basis.
#[derive(Debug, Clone)]
pub struct VideoPoller {
    interval: Duration,
    timeout: Duration,
    retry: RetryPolicy,
}

impl VideoPoller {
    /// Create a poller.
    pub fn new(interval: Duration, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            interval,
            timeout,
            retry,
        }
    }

    /// Submit `request` and wait for the clip URI.
    ///
    /// # Errors
    ///
    /// Returns a generation error if submission or polling fails, the job
    /// reports failure, the timeout elapses or `cancel` fires.
    #[instrument(skip(self, video, request, cancel), fields(keyframe = %request.keyframe_uri()))]
    pub async fn generate(
        &self,
        video: &dyn VideoGenerator,
        request: &VideoRequest,
        cancel: &CancellationToken,
    ) -> StorycraftResult<String> {
        let job = or_cancelled(
            cancel,
            "video",
            self.retry.run("video_submit", || video.submit(request)),
        )
        .await?;
        debug!(job = %job, "Video job submitted");

        let deadline = Instant::now() + self.timeout;
        loop {
            let poll = self.retry.run("video_poll", || video.poll(&job));
            let Some(status) = cancel.run_until_cancelled(poll).await else {
                abandon(video, &job).await;
                return Err(cancelled());
            };
            match status? {
                VideoJobStatus::Completed(uri) => {
                    debug!(job = %job, uri = %uri, "Video job completed");
                    return Ok(uri);
                }
                VideoJobStatus::Failed(reason) => {
                    return Err(GenerationError::new(GenerationErrorKind::JobFailed {
                        capability: "video".to_string(),
                        message: reason,
                    })
                    .into());
                }
                VideoJobStatus::Pending => {}
            }

            let now = Instant::now();
            if now >= deadline {
                abandon(video, &job).await;
                return Err(GenerationError::new(GenerationErrorKind::Timeout {
                    capability: "video".to_string(),
                    seconds: self.timeout.as_secs(),
                })
                .into());
            }

            let wait = self.interval.min(deadline - now);
            tokio::select! {
                _ = cancel.cancelled() => {
                    abandon(video, &job).await;
                    return Err(cancelled());
                }
                _ = sleep(wait) => {}
            }
        }
    }
}

fn cancelled() -> StorycraftError {
    GenerationError::new(GenerationErrorKind::Cancelled("video".to_string())).into()
}

async fn abandon(video: &dyn VideoGenerator, job: &VideoJob) {
    match timeout(ABANDON_TIMEOUT, video.cancel(job)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(job = %job, error = %e, "Failed to cancel video job"),
        Err(_) => warn!(job = %job, "Video job cancellation did not answer in time"),
    }
}

//! Run-scoped background music.

use std::sync::Arc;
use storycraft_interface::MusicGenerator;
use storycraft_retry::RetryPolicy;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Generates the background track at most once per run.
///
/// Every scene asks for the track; the first request generates it from the
/// music description and all later requests, concurrent ones included, get
/// the same answer. A failed generation is remembered as `None`.
pub struct MusicCache {
    music: Arc<dyn MusicGenerator>,
    retry: RetryPolicy,
    description: String,
    track: OnceCell<Option<String>>,
}

impl MusicCache {
    /// Create an empty cache for one run.
    pub fn new(
        music: Arc<dyn MusicGenerator>,
        retry: RetryPolicy,
        description: impl Into<String>,
    ) -> Self {
        Self {
            music,
            retry,
            description: description.into(),
            track: OnceCell::new(),
        }
    }

    /// The track URI, generating it on first use.
    pub async fn track(&self) -> Option<String> {
        self.track
            .get_or_init(|| async {
                let music = &self.music;
                let prompt = self.description.as_str();
                match self.retry.run("music", || music.generate_music(prompt)).await {
                    Ok(uri) => {
                        info!(uri = %uri, "Background music generated");
                        Some(uri)
                    }
                    Err(e) => {
                        warn!(error = %e, "Background music failed, continuing without it");
                        None
                    }
                }
            })
            .await
            .clone()
    }
}

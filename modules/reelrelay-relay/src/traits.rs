// Trait abstractions for the pipeline's external collaborators.
//
// VideoSearch — the search capability (YouTube Data API in production).
// VideoDownloader — materializes a remote video locally (yt-dlp).
// CaptionWriter — text-generation capability for caption synthesis.
// VideoPublisher — uploads a clip to the destination platform.
//
// These enable deterministic testing with the doubles in `testing`:
// no network, no subprocesses. `cargo test` in seconds.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use youtube_client::{VideoItem, YouTubeClient};

// ---------------------------------------------------------------------------
// VideoSearch
// ---------------------------------------------------------------------------

#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search short-duration videos for a topic published after the given
    /// instant. Returns raw provider records with snippet + statistics.
    async fn search_shorts(
        &self,
        query: &str,
        published_after: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<VideoItem>>;
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    /// Absorbs the provider's two-step shape: search.list for ids, then
    /// videos.list for snippet + statistics.
    async fn search_shorts(
        &self,
        query: &str,
        published_after: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<VideoItem>> {
        let hits = self.search_videos(query, published_after, max_results).await?;
        let ids: Vec<String> = hits.into_iter().filter_map(|h| h.id.video_id).collect();
        Ok(self.list_videos(&ids).await?)
    }
}

// ---------------------------------------------------------------------------
// VideoDownloader
// ---------------------------------------------------------------------------

#[async_trait]
pub trait VideoDownloader: Send + Sync {
    /// Materialize the video at `url` under `dest_dir` using `file_stem`
    /// as the base name. Returns the path of the downloaded artifact.
    async fn download(&self, url: &str, dest_dir: &Path, file_stem: &str) -> Result<PathBuf>;
}

// ---------------------------------------------------------------------------
// CaptionWriter
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CaptionWriter: Send + Sync {
    /// Return the first generated continuation for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// VideoPublisher
// ---------------------------------------------------------------------------

/// Publish failures split by whether the rest of the run can continue.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Credentials rejected. Every later publish would fail the same way,
    /// so the driver aborts the remaining jobs.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// This item failed; later items may still succeed.
    #[error("{0}")]
    Failed(String),
}

#[async_trait]
pub trait VideoPublisher: Send + Sync {
    /// Upload a local clip with its caption. Returns the destination
    /// platform's media id.
    async fn publish(&self, video: &Path, caption: &str) -> Result<String, PublishError>;
}

#[async_trait]
impl VideoPublisher for instagram_client::InstagramClient {
    async fn publish(&self, video: &Path, caption: &str) -> Result<String, PublishError> {
        match self.publish_clip(video, caption).await {
            Ok(media) => Ok(media.id),
            Err(instagram_client::InstagramError::Auth { status, message }) => {
                Err(PublishError::Auth(format!("status {status}: {message}")))
            }
            Err(e) => Err(PublishError::Failed(e.to_string())),
        }
    }
}

// Test doubles for the relay pipeline.
//
// Four mocks matching the four capability traits:
// - MockSearch (VideoSearch) — canned provider items or a forced failure
// - MockDownloader (VideoDownloader) — writes real files under a temp dir
// - MockCaptioner (CaptionWriter) — canned caption, records prompts
// - MockPublisher (VideoPublisher) — records calls, scriptable failures
//
// Plus InstantRelease (zero-wait strategy) and fixture helpers.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use reelrelay_common::Candidate;
use youtube_client::{Snippet, Statistics, VideoItem};

use crate::discovery::watch_url;
use crate::scheduling::ReleaseStrategy;
use crate::traits::{CaptionWriter, PublishError, VideoDownloader, VideoPublisher, VideoSearch};

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

pub fn video_item(
    id: &str,
    title: &str,
    description: &str,
    views: i64,
    likes: i64,
    comments: i64,
) -> VideoItem {
    VideoItem {
        id: id.to_string(),
        snippet: Snippet {
            title: title.to_string(),
            description: description.to_string(),
        },
        statistics: Statistics {
            view_count: Some(views.to_string()),
            like_count: Some(likes.to_string()),
            comment_count: Some(comments.to_string()),
        },
    }
}

pub fn candidate(id: &str, views: i64, likes: i64, comments: i64) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: format!("{id} #shorts"),
        description: String::new(),
        view_count: views,
        like_count: likes,
        comment_count: comments,
        url: watch_url(id),
        score: 0,
    }
}

pub fn candidate_titled(id: &str, title: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        view_count: 0,
        like_count: 0,
        comment_count: 0,
        url: watch_url(id),
        score: 0,
    }
}

// ---------------------------------------------------------------------------
// MockSearch
// ---------------------------------------------------------------------------

/// Canned search provider. Returns the registered items truncated to the
/// requested count, or a forced failure.
pub struct MockSearch {
    items: Vec<VideoItem>,
    fail: Option<String>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            fail: None,
        }
    }

    pub fn with_items(mut self, items: Vec<VideoItem>) -> Self {
        self.items = items;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail = Some(message.to_string());
        self
    }
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSearch for MockSearch {
    async fn search_shorts(
        &self,
        _query: &str,
        _published_after: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<VideoItem>> {
        if let Some(msg) = &self.fail {
            return Err(anyhow!("MockSearch: {msg}"));
        }
        Ok(self
            .items
            .iter()
            .take(max_results as usize)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MockDownloader
// ---------------------------------------------------------------------------

/// Writes an empty .mp4 under the destination directory, so path handling
/// and collision behavior run against a real filesystem.
pub struct MockDownloader {
    fail_urls: HashSet<String>,
}

impl MockDownloader {
    pub fn new() -> Self {
        Self {
            fail_urls: HashSet::new(),
        }
    }

    pub fn fail_on(mut self, url: &str) -> Self {
        self.fail_urls.insert(url.to_string());
        self
    }
}

impl Default for MockDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoDownloader for MockDownloader {
    async fn download(&self, url: &str, dest_dir: &Path, file_stem: &str) -> Result<PathBuf> {
        if self.fail_urls.contains(url) {
            return Err(anyhow!("MockDownloader: scripted failure for {url}"));
        }
        tokio::fs::create_dir_all(dest_dir).await?;
        let path = dest_dir.join(format!("{file_stem}.mp4"));
        tokio::fs::write(&path, b"").await?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// MockCaptioner
// ---------------------------------------------------------------------------

/// Canned caption writer. Records every prompt it sees. Clones share the
/// prompt log, so tests can keep a handle after moving one into the relay.
#[derive(Clone)]
pub struct MockCaptioner {
    response: String,
    fail: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockCaptioner {
    pub fn new() -> Self {
        Self {
            response: "Generated caption #viral".to_string(),
            fail: false,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_caption(mut self, caption: &str) -> Self {
        self.response = caption.to_string();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockCaptioner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptionWriter for MockCaptioner {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(anyhow!("MockCaptioner: scripted failure"));
        }
        Ok(self.response.clone())
    }
}

// ---------------------------------------------------------------------------
// MockPublisher
// ---------------------------------------------------------------------------

/// Records successful publishes; failures are scripted per path substring
/// or per attempt index. Clones share the publish log.
#[derive(Clone)]
pub struct MockPublisher {
    published: Arc<Mutex<Vec<(PathBuf, String)>>>,
    attempts: Arc<Mutex<usize>>,
    fail_path_containing: Option<String>,
    auth_fail_on_attempt: Option<usize>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            published: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(0)),
            fail_path_containing: None,
            auth_fail_on_attempt: None,
        }
    }

    /// Fail (non-fatally) any publish whose path contains `fragment`.
    pub fn fail_on_path_containing(mut self, fragment: &str) -> Self {
        self.fail_path_containing = Some(fragment.to_string());
        self
    }

    /// Reject credentials on the zero-based `attempt`-th publish call.
    pub fn auth_fail_on_attempt(mut self, attempt: usize) -> Self {
        self.auth_fail_on_attempt = Some(attempt);
        self
    }

    pub fn published(&self) -> Vec<(PathBuf, String)> {
        self.published.lock().unwrap().clone()
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoPublisher for MockPublisher {
    async fn publish(&self, video: &Path, caption: &str) -> Result<String, PublishError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let current = *attempts;
            *attempts += 1;
            current
        };

        if self.auth_fail_on_attempt == Some(attempt) {
            return Err(PublishError::Auth("MockPublisher: token rejected".to_string()));
        }

        if let Some(fragment) = &self.fail_path_containing {
            if video.to_string_lossy().contains(fragment.as_str()) {
                return Err(PublishError::Failed(format!(
                    "MockPublisher: scripted failure for {}",
                    video.display()
                )));
            }
        }

        self.published
            .lock()
            .unwrap()
            .push((video.to_path_buf(), caption.to_string()));
        Ok(format!("media-{attempt}"))
    }
}

// ---------------------------------------------------------------------------
// InstantRelease
// ---------------------------------------------------------------------------

/// Zero-wait release strategy so pipeline tests never sleep. Production
/// strategies must return an instant strictly after `now`; this one
/// deliberately does not.
pub struct InstantRelease;

impl ReleaseStrategy for InstantRelease {
    fn next_slot(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now
    }
}

pub mod error;
pub mod types;

pub use error::{Result, YouTubeError};
pub use types::{ListResponse, SearchItem, Snippet, Statistics, VideoItem};

use chrono::{DateTime, SecondsFormat, Utc};

const BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Thin client over the YouTube Data API v3.
///
/// Two-step lookup mirrors the API shape: search.list returns video ids,
/// videos.list returns snippet + statistics for a batch of ids.
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Search short-duration videos matching `query` published after the
    /// given instant. Returns at most `max_results` search items.
    pub async fn search_videos(
        &self,
        query: &str,
        published_after: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<SearchItem>> {
        let url = format!("{}/search", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("part", "id"),
                ("type", "video"),
                ("videoDuration", "short"),
                ("q", query),
                (
                    "publishedAfter",
                    &published_after.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                ("maxResults", &max_results.to_string()),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(YouTubeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let list: ListResponse<SearchItem> = resp.json().await?;
        tracing::debug!(count = list.items.len(), query, "search.list returned");
        Ok(list.items)
    }

    /// Fetch snippet + statistics for a batch of video ids.
    pub async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/videos", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet,statistics"),
                ("id", &ids.join(",")),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(YouTubeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let list: ListResponse<VideoItem> = resp.json().await?;
        tracing::debug!(count = list.items.len(), "videos.list returned");
        Ok(list.items)
    }
}

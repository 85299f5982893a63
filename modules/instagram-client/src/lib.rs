pub mod error;
pub mod types;

pub use error::{InstagramError, Result};
pub use types::{MediaContainer, PublishedMedia};

use std::path::Path;

use reqwest::multipart;

const BASE_URL: &str = "https://graph.instagram.com/v21.0";

/// Thin client over the Instagram Graph API clip-publishing flow.
///
/// Two-step flow mirrors the API shape: upload the video into a media
/// container, then publish the container.
pub struct InstagramClient {
    client: reqwest::Client,
    access_token: String,
    account_id: String,
    base_url: String,
}

impl InstagramClient {
    pub fn new(access_token: String, account_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
            account_id,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Upload a local clip into a media container. Returns the container id.
    pub async fn create_clip_container(
        &self,
        video_path: &Path,
        caption: &str,
    ) -> Result<MediaContainer> {
        let bytes = tokio::fs::read(video_path)
            .await
            .map_err(|e| InstagramError::Media(format!("{}: {e}", video_path.display())))?;

        let file_name = video_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip.mp4".to_string());

        let form = multipart::Form::new()
            .text("media_type", "REELS")
            .text("caption", caption.to_string())
            .part(
                "video_file",
                multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("video/mp4")
                    .map_err(|e| InstagramError::Media(e.to_string()))?,
            );

        let url = format!("{}/{}/media", self.base_url, self.account_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await?;

        self.parse_response(resp).await
    }

    /// Publish a previously created container.
    pub async fn publish_container(&self, container_id: &str) -> Result<PublishedMedia> {
        let url = format!("{}/{}/media_publish", self.base_url, self.account_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[("creation_id", container_id)])
            .send()
            .await?;

        self.parse_response(resp).await
    }

    /// Upload and publish a clip end-to-end.
    pub async fn publish_clip(&self, video_path: &Path, caption: &str) -> Result<PublishedMedia> {
        tracing::info!(path = %video_path.display(), "Uploading clip");
        let container = self.create_clip_container(video_path, caption).await?;
        tracing::info!(container_id = %container.id, "Container created, publishing");
        let published = self.publish_container(&container.id).await?;
        tracing::info!(media_id = %published.id, "Clip published");
        Ok(published)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T> {
        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let body = resp.text().await.unwrap_or_default();
            return Err(InstagramError::Auth {
                status: status.as_u16(),
                message: body,
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InstagramError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.json().await?)
    }
}

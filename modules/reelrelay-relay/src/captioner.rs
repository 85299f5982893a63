use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::CaptionWriter;

/// Fixed prompt template for caption synthesis. The title is interpolated
/// verbatim; it was never validated upstream and does not need to be.
pub fn caption_prompt(title: &str) -> String {
    format!("Write a catchy caption with hashtags for a viral video titled: '{title}'.")
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Caption capability backed by an OpenAI-compatible chat completions
/// endpoint.
pub struct CompletionCaptioner {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl CompletionCaptioner {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CaptionWriter for CompletionCaptioner {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %self.model, "Caption completion request");

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: 120,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Caption API error ({}): {}", status, error_text));
        }

        let parsed: ChatResponse = response.json().await?;
        let first = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Caption API returned no choices"))?;

        Ok(first.message.content.trim().to_string())
    }
}

use std::env;
use std::path::PathBuf;

use tracing::info;

/// Application configuration loaded from environment variables.
///
/// Run parameters (topic, lookback, result cap) are static for the whole
/// run; no stage re-reads the environment after construction.
#[derive(Debug, Clone)]
pub struct Config {
    // Source platform
    pub youtube_api_key: String,

    // Destination platform
    pub instagram_access_token: String,
    pub instagram_account_id: String,

    // Caption generation
    pub caption_api_key: String,
    pub caption_api_base_url: String,
    pub caption_model: String,

    // Run parameters
    pub search_query: String,
    pub days_ago: i64,
    pub max_results: usize,
    pub download_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            youtube_api_key: required_env("YOUTUBE_API_KEY"),
            instagram_access_token: required_env("INSTAGRAM_ACCESS_TOKEN"),
            instagram_account_id: required_env("INSTAGRAM_ACCOUNT_ID"),
            caption_api_key: required_env("CAPTION_API_KEY"),
            caption_api_base_url: env::var("CAPTION_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            caption_model: env::var("CAPTION_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            search_query: env::var("SEARCH_QUERY").unwrap_or_else(|_| "trending".to_string()),
            days_ago: env::var("DAYS_AGO")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .expect("DAYS_AGO must be a number"),
            max_results: env::var("MAX_RESULTS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("MAX_RESULTS must be a number"),
            download_dir: env::var("DOWNLOAD_DIR")
                .unwrap_or_else(|_| "downloads".to_string())
                .into(),
        }
    }

    /// Log the effective configuration with secrets masked.
    pub fn log_redacted(&self) {
        info!(
            youtube_api_key = %redact(&self.youtube_api_key),
            instagram_access_token = %redact(&self.instagram_access_token),
            instagram_account_id = %self.instagram_account_id,
            caption_api_key = %redact(&self.caption_api_key),
            caption_api_base_url = %self.caption_api_base_url,
            caption_model = %self.caption_model,
            search_query = %self.search_query,
            days_ago = self.days_ago,
            max_results = self.max_results,
            download_dir = %self.download_dir.display(),
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn redact(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        let prefix: String = secret.chars().take(4).collect();
        format!("{prefix}****")
    }
}

#[cfg(test)]
mod tests {
    use super::redact;

    #[test]
    fn redact_keeps_only_prefix() {
        assert_eq!(redact("sk-abcdef123456"), "sk-a****");
        assert_eq!(redact("abc"), "****");
    }
}

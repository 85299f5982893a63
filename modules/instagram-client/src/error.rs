use thiserror::Error;

pub type Result<T> = std::result::Result<T, InstagramError>;

#[derive(Debug, Error)]
pub enum InstagramError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The access token was rejected. Callers treat this as fatal: every
    /// later request in the run would fail the same way.
    #[error("Authentication rejected (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Media file error: {0}")]
    Media(String),
}

impl From<reqwest::Error> for InstagramError {
    fn from(err: reqwest::Error) -> Self {
        InstagramError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for InstagramError {
    fn from(err: serde_json::Error) -> Self {
        InstagramError::Parse(err.to_string())
    }
}

use thiserror::Error;

/// Pipeline error taxonomy. Fatal variants abort the run; per-item variants
/// are isolated by the driver so one bad candidate never blocks others.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The search provider could not be reached or returned a structurally
    /// invalid response. Fatal for the run.
    #[error("Search source unavailable: {0}")]
    SourceUnavailable(String),

    /// A single candidate's download failed. Skip and continue.
    #[error("Download failed for {id}: {reason}")]
    DownloadFailed { id: String, reason: String },

    /// Caption generation failed for one item. The driver degrades to the
    /// bare title instead of propagating.
    #[error("Caption generation unavailable: {0}")]
    CaptionUnavailable(String),

    /// A single publish attempt failed. Skip and continue.
    #[error("Publish failed for {id}: {reason}")]
    PublishFailed { id: String, reason: String },

    /// The publish capability rejected our credentials. Fatal for all
    /// remaining publishes in the run.
    #[error("Publish authentication failed: {0}")]
    PublishAuthFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// One discovered video, prior to download.
///
/// Created by the candidate source from raw provider data, enriched with
/// `score` exactly once by the scorer, immutable afterwards. Nothing here
/// survives the run; there is no cross-run persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Opaque platform identifier, unique within a run.
    pub id: String,
    /// Free text, used only for filtering and captioning. Never validated.
    pub title: String,
    pub description: String,
    /// Engagement counts. Absent provider fields read as 0. Negative values
    /// from a misbehaving provider are kept as-is, not corrected.
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    /// Watch URL, derived deterministically from `id`.
    pub url: String,
    /// Engagement score. Zero until the scorer runs.
    pub score: i64,
}

/// The ordered, size-bounded list of candidates selected for processing.
/// Sorted by score descending; ties keep provider order.
pub type RankedSet = Vec<Candidate>;

/// A locally downloaded video artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Identity of the originating candidate. Lookup only, no ownership.
    pub source_id: String,
    /// Where the download capability materialized the file.
    pub local_path: PathBuf,
    /// Derived from the artifact's base name.
    pub title: String,
}

/// A media item paired with its caption and computed release time.
/// Consumed exactly once by the publisher driver, then discarded.
#[derive(Debug, Clone)]
pub struct PublishJob {
    pub item: MediaItem,
    pub caption: String,
    pub release_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use tracing::info;

use reelrelay_common::{Candidate, RelayError};
use youtube_client::VideoItem;

use crate::traits::VideoSearch;

/// How many raw results to request per wanted candidate. The shorts filter
/// has an unpredictable pass rate, so we over-fetch to keep the final
/// ranked set near the requested size.
const FILTER_INFLATION: u32 = 2;

/// Queries the search capability and narrows the raw results to qualifying
/// short-form candidates.
pub struct CandidateSource<'a, S: VideoSearch> {
    provider: &'a S,
}

/// Raw and qualifying counts from one discovery pass.
pub struct DiscoveryResult {
    pub candidates: Vec<Candidate>,
    pub raw_count: usize,
}

impl<'a, S: VideoSearch> CandidateSource<'a, S> {
    pub fn new(provider: &'a S) -> Self {
        Self { provider }
    }

    /// Discover qualifying candidates for a topic. `limit` is the number of
    /// candidates the caller ultimately wants; the provider is asked for up
    /// to twice that. A provider failure is fatal for the run.
    pub async fn discover(
        &self,
        topic: &str,
        published_after: DateTime<Utc>,
        limit: usize,
    ) -> Result<DiscoveryResult, RelayError> {
        let raw = self
            .provider
            .search_shorts(topic, published_after, limit as u32 * FILTER_INFLATION)
            .await
            .map_err(|e| RelayError::SourceUnavailable(e.to_string()))?;

        let raw_count = raw.len();
        let candidates: Vec<Candidate> = raw
            .into_iter()
            .filter(is_short)
            .map(candidate_from_item)
            .collect();

        info!(
            topic,
            raw = raw_count,
            qualifying = candidates.len(),
            "Discovery complete"
        );

        Ok(DiscoveryResult {
            candidates,
            raw_count,
        })
    }
}

/// Lexical shorts heuristic: the lowercase title or description contains
/// the literal substring "shorts". Known source of false positives (a long
/// video mentioning shorts) and false negatives (an untagged short); that
/// trade-off is intentional, do not "fix" it here.
pub fn is_short(item: &VideoItem) -> bool {
    item.snippet.title.to_lowercase().contains("shorts")
        || item.snippet.description.to_lowercase().contains("shorts")
}

/// Watch URL derived deterministically from the video id.
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/shorts/{id}")
}

fn candidate_from_item(item: VideoItem) -> Candidate {
    let url = watch_url(&item.id);
    Candidate {
        id: item.id,
        title: item.snippet.title,
        description: item.snippet.description,
        view_count: item.statistics.views(),
        like_count: item.statistics.likes(),
        comment_count: item.statistics.comments(),
        url,
        score: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::video_item;

    #[test]
    fn is_short_matches_title_or_description() {
        assert!(is_short(&video_item("a", "Best #shorts ever", "", 0, 0, 0)));
        assert!(is_short(&video_item("b", "Cat video", "daily shorts feed", 0, 0, 0)));
        assert!(!is_short(&video_item("c", "Cat video", "a long documentary", 0, 0, 0)));
    }

    #[test]
    fn is_short_is_case_insensitive() {
        assert!(is_short(&video_item("a", "MY SHORTS COMPILATION", "", 0, 0, 0)));
        assert!(is_short(&video_item("b", "ShOrTs", "", 0, 0, 0)));
    }

    #[test]
    fn is_short_survives_non_ascii_text() {
        assert!(is_short(&video_item("a", "Ünïcödé SHORTS 日本語", "", 0, 0, 0)));
        assert!(!is_short(&video_item("b", "İstanbul gezisi", "güzel şehir", 0, 0, 0)));
    }

    #[test]
    fn watch_url_is_derived_from_id() {
        assert_eq!(watch_url("abc123"), "https://www.youtube.com/shorts/abc123");
    }

    #[test]
    fn candidate_carries_statistics_with_zero_defaults() {
        let c = candidate_from_item(video_item("v1", "shorts clip", "", 100, 10, 1));
        assert_eq!(c.view_count, 100);
        assert_eq!(c.like_count, 10);
        assert_eq!(c.comment_count, 1);
        assert_eq!(c.score, 0);

        let bare = candidate_from_item(video_item("v2", "shorts clip", "", 0, 0, 0));
        assert_eq!(bare.view_count, 0);
    }
}

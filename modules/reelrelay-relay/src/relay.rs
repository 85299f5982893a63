use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::sync::watch;
use tracing::{error, info, warn};

use reelrelay_common::{Candidate, MediaItem, PublishJob, RelayError};

use crate::captioner::caption_prompt;
use crate::discovery::CandidateSource;
use crate::downloader::sanitize_file_stem;
use crate::ranking;
use crate::scheduling::{wait_duration, ReleaseStrategy};
use crate::traits::{CaptionWriter, PublishError, VideoDownloader, VideoPublisher, VideoSearch};

/// One item that did not make it to a successful publish, and why.
#[derive(Debug)]
pub struct SkippedItem {
    pub id: String,
    pub reason: String,
}

/// Stats from a relay run.
#[derive(Debug, Default)]
pub struct RelayStats {
    pub discovered: u32,
    pub qualified: u32,
    pub ranked: u32,
    pub fetched: u32,
    pub captions_generated: u32,
    pub caption_fallbacks: u32,
    pub published: u32,
    pub skipped: Vec<SkippedItem>,
}

impl std::fmt::Display for RelayStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Relay Run Complete ===")?;
        writeln!(f, "Raw results:        {}", self.discovered)?;
        writeln!(f, "Qualifying shorts:  {}", self.qualified)?;
        writeln!(f, "Ranked:             {}", self.ranked)?;
        writeln!(f, "Fetched:            {}", self.fetched)?;
        writeln!(f, "Captions generated: {}", self.captions_generated)?;
        writeln!(f, "Caption fallbacks:  {}", self.caption_fallbacks)?;
        writeln!(f, "Published:          {}", self.published)?;
        if !self.skipped.is_empty() {
            writeln!(f, "\nSkipped items:")?;
            for item in &self.skipped {
                writeln!(f, "  {}: {}", item.id, item.reason)?;
            }
        }
        Ok(())
    }
}

/// Static parameters for one run. Nothing here is re-read per item.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub query: String,
    pub published_after: DateTime<Utc>,
    pub max_results: usize,
}

enum ItemOutcome {
    Ready {
        item: MediaItem,
        caption: String,
        degraded: bool,
    },
    Skipped {
        id: String,
        reason: String,
    },
}

/// The discovery→rank→fetch→caption→publish driver.
///
/// Fetch and caption work runs concurrently across items with bounded
/// parallelism; publishing stays strictly sequential in ranked order, each
/// job waiting out its release slot on a cancellable timer.
pub struct Relay<S, D, C, P> {
    source: S,
    downloader: D,
    captioner: C,
    publisher: P,
    release: Box<dyn ReleaseStrategy>,
    download_dir: PathBuf,
    fetch_concurrency: usize,
}

impl<S, D, C, P> Relay<S, D, C, P>
where
    S: VideoSearch,
    D: VideoDownloader,
    C: CaptionWriter,
    P: VideoPublisher,
{
    pub fn new(
        source: S,
        downloader: D,
        captioner: C,
        publisher: P,
        release: Box<dyn ReleaseStrategy>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            source,
            downloader,
            captioner,
            publisher,
            release,
            download_dir,
            fetch_concurrency: 4,
        }
    }

    pub fn with_fetch_concurrency(mut self, n: usize) -> Self {
        self.fetch_concurrency = n.max(1);
        self
    }

    /// Execute one full pipeline pass. Per-item failures are recorded in the
    /// returned stats; fatal failures (source unreachable, publish auth
    /// rejected) abort with an error.
    pub async fn run(
        &self,
        params: &RunParams,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<RelayStats, RelayError> {
        if params.max_results == 0 {
            return Err(RelayError::Config(
                "max_results must be at least 1".to_string(),
            ));
        }

        let mut stats = RelayStats::default();

        let discovery = CandidateSource::new(&self.source)
            .discover(&params.query, params.published_after, params.max_results)
            .await?;
        stats.discovered = discovery.raw_count as u32;
        stats.qualified = discovery.candidates.len() as u32;

        if discovery.candidates.is_empty() {
            info!("No qualifying candidates found, nothing to do");
            return Ok(stats);
        }

        let ranked = ranking::rank(discovery.candidates, params.max_results);
        stats.ranked = ranked.len() as u32;
        for (idx, c) in ranked.iter().enumerate() {
            info!(
                rank = idx + 1,
                id = %c.id,
                score = c.score,
                views = c.view_count,
                likes = c.like_count,
                comments = c.comment_count,
                title = %c.title,
                "Ranked candidate"
            );
        }

        // File stems are claimed up front, in ranked order, so collision
        // handling does not depend on download completion order.
        let stems = assign_file_stems(&ranked);

        let outcomes: Vec<ItemOutcome> = stream::iter(ranked.into_iter().zip(stems))
            .map(|(candidate, stem)| self.fetch_and_caption(candidate, stem))
            .buffered(self.fetch_concurrency)
            .collect()
            .await;

        for outcome in &outcomes {
            match outcome {
                ItemOutcome::Ready { degraded, .. } => {
                    stats.fetched += 1;
                    if *degraded {
                        stats.caption_fallbacks += 1;
                    } else {
                        stats.captions_generated += 1;
                    }
                }
                ItemOutcome::Skipped { .. } => {}
            }
        }

        let mut cancelled = false;
        for outcome in outcomes {
            let (item, caption) = match outcome {
                ItemOutcome::Skipped { id, reason } => {
                    stats.skipped.push(SkippedItem { id, reason });
                    continue;
                }
                ItemOutcome::Ready { item, caption, .. } => (item, caption),
            };

            if cancelled || *shutdown.borrow() {
                cancelled = true;
                stats.skipped.push(SkippedItem {
                    id: item.source_id,
                    reason: "run cancelled before publish".to_string(),
                });
                continue;
            }

            let now = Utc::now();
            let job = PublishJob {
                item,
                caption,
                release_at: self.release.next_slot(now),
            };

            let wait = wait_duration(job.release_at, now);
            if !wait.is_zero() {
                info!(
                    id = %job.item.source_id,
                    release_at = %job.release_at,
                    wait_secs = wait.as_secs(),
                    "Waiting for release slot"
                );
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = shutdown.changed() => {
                        warn!(id = %job.item.source_id, "Shutdown requested, releasing wait timer");
                        cancelled = true;
                        stats.skipped.push(SkippedItem {
                            id: job.item.source_id,
                            reason: "run cancelled before publish".to_string(),
                        });
                        continue;
                    }
                }
            }

            info!(
                id = %job.item.source_id,
                path = %job.item.local_path.display(),
                "Publishing clip"
            );
            match self
                .publisher
                .publish(&job.item.local_path, &job.caption)
                .await
            {
                Ok(media_id) => {
                    info!(id = %job.item.source_id, media_id = %media_id, "Published");
                    stats.published += 1;
                }
                Err(PublishError::Auth(msg)) => {
                    error!(id = %job.item.source_id, %msg, "Publish authentication failed, aborting run");
                    warn!("Partial run summary before abort: {stats}");
                    return Err(RelayError::PublishAuthFailed(msg));
                }
                Err(PublishError::Failed(msg)) => {
                    let err = RelayError::PublishFailed {
                        id: job.item.source_id.clone(),
                        reason: msg,
                    };
                    warn!(error = %err, "Continuing with next item");
                    stats.skipped.push(SkippedItem {
                        id: job.item.source_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(stats)
    }

    async fn fetch_and_caption(&self, candidate: Candidate, stem: String) -> ItemOutcome {
        let path = match self
            .downloader
            .download(&candidate.url, &self.download_dir, &stem)
            .await
        {
            Ok(path) => path,
            Err(e) => {
                let err = RelayError::DownloadFailed {
                    id: candidate.id.clone(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "Skipping item");
                return ItemOutcome::Skipped {
                    id: candidate.id,
                    reason: err.to_string(),
                };
            }
        };

        // Title comes from the artifact's base name, matching what the
        // download capability actually wrote.
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| stem.clone());

        let item = MediaItem {
            source_id: candidate.id,
            local_path: path,
            title,
        };

        match self.captioner.complete(&caption_prompt(&item.title)).await {
            Ok(caption) if !caption.trim().is_empty() => ItemOutcome::Ready {
                caption: caption.trim().to_string(),
                item,
                degraded: false,
            },
            Ok(_) => {
                warn!(id = %item.source_id, "Caption model returned empty text, falling back to title");
                ItemOutcome::Ready {
                    caption: item.title.clone(),
                    item,
                    degraded: true,
                }
            }
            Err(e) => {
                let err = RelayError::CaptionUnavailable(e.to_string());
                warn!(id = %item.source_id, error = %err, "Falling back to bare title");
                ItemOutcome::Ready {
                    caption: item.title.clone(),
                    item,
                    degraded: true,
                }
            }
        }
    }
}

/// Claim a unique file stem per ranked candidate. The first user of a title
/// keeps the bare name; later collisions get a `-<id>` suffix, which is
/// unique within the run.
fn assign_file_stems(ranked: &[Candidate]) -> Vec<String> {
    let mut taken = HashSet::new();
    ranked
        .iter()
        .map(|c| {
            let base = sanitize_file_stem(&c.title);
            let stem = if taken.contains(&base) {
                format!("{base}-{}", c.id)
            } else {
                base
            };
            taken.insert(stem.clone());
            stem
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::assign_file_stems;
    use crate::testing::candidate_titled;

    #[test]
    fn colliding_titles_get_id_suffixes() {
        let ranked = vec![
            candidate_titled("id1", "Same Title"),
            candidate_titled("id2", "Same Title"),
            candidate_titled("id3", "Other"),
        ];
        let stems = assign_file_stems(&ranked);
        assert_eq!(stems, ["Same Title", "Same Title-id2", "Other"]);
    }

    #[test]
    fn distinct_titles_keep_bare_names() {
        let ranked = vec![
            candidate_titled("a", "One"),
            candidate_titled("b", "Two"),
        ];
        assert_eq!(assign_file_stems(&ranked), ["One", "Two"]);
    }
}

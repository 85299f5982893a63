// End-to-end pipeline scenarios against the four capability doubles.
// No network, no subprocesses; downloads land in a tempdir.

use chrono::{TimeDelta, Utc};
use tempfile::TempDir;
use tokio::sync::watch;

use reelrelay_common::RelayError;
use reelrelay_relay::relay::{Relay, RelayStats, RunParams};
use reelrelay_relay::testing::{
    video_item, InstantRelease, MockCaptioner, MockDownloader, MockPublisher, MockSearch,
};

fn params(max_results: usize) -> RunParams {
    RunParams {
        query: "trending".to_string(),
        published_after: Utc::now() - TimeDelta::days(1),
        max_results,
    }
}

fn relay(
    search: MockSearch,
    downloader: MockDownloader,
    captioner: MockCaptioner,
    publisher: MockPublisher,
    dir: &TempDir,
) -> Relay<MockSearch, MockDownloader, MockCaptioner, MockPublisher> {
    Relay::new(
        search,
        downloader,
        captioner,
        publisher,
        Box::new(InstantRelease),
        dir.path().to_path_buf(),
    )
}

async fn run(
    relay: &Relay<MockSearch, MockDownloader, MockCaptioner, MockPublisher>,
    max_results: usize,
) -> Result<RelayStats, RelayError> {
    let (_tx, rx) = watch::channel(false);
    relay.run(&params(max_results), rx).await
}

#[tokio::test]
async fn ranks_by_engagement_and_publishes_in_order() {
    let search = MockSearch::new().with_items(vec![
        video_item("low", "Skate #shorts", "", 100, 10, 1), // score 150
        video_item("high", "Cat #shorts", "", 50, 5, 10),   // score 210
    ]);
    let publisher = MockPublisher::new();
    let captioner = MockCaptioner::new().with_caption("Wow! #fyp");
    let dir = TempDir::new().unwrap();
    let relay = relay(
        search,
        MockDownloader::new(),
        captioner,
        publisher.clone(),
        &dir,
    );

    let stats = run(&relay, 10).await.unwrap();

    assert_eq!(stats.qualified, 2);
    assert_eq!(stats.published, 2);
    let published = publisher.published();
    assert_eq!(published.len(), 2);
    // Higher score first: the cat clip, then the skate clip.
    assert!(published[0].0.to_string_lossy().contains("Cat"));
    assert!(published[1].0.to_string_lossy().contains("Skate"));
    assert_eq!(published[0].1, "Wow! #fyp");
}

#[tokio::test]
async fn non_qualifying_items_never_enter_the_ranking() {
    let search = MockSearch::new().with_items(vec![
        video_item("a", "Epic #shorts", "", 10, 0, 0),
        video_item("b", "Full-length documentary", "two hours", 9999, 0, 0),
    ]);
    let publisher = MockPublisher::new();
    let dir = TempDir::new().unwrap();
    let relay = relay(
        search,
        MockDownloader::new(),
        MockCaptioner::new(),
        publisher.clone(),
        &dir,
    );

    let stats = run(&relay, 10).await.unwrap();

    assert_eq!(stats.discovered, 2);
    assert_eq!(stats.qualified, 1);
    assert_eq!(stats.published, 1);
    assert!(publisher.published()[0].0.to_string_lossy().contains("Epic"));
}

#[tokio::test]
async fn empty_search_terminates_cleanly() {
    let dir = TempDir::new().unwrap();
    let relay = relay(
        MockSearch::new(),
        MockDownloader::new(),
        MockCaptioner::new(),
        MockPublisher::new(),
        &dir,
    );

    let stats = run(&relay, 10).await.unwrap();

    assert_eq!(stats.discovered, 0);
    assert_eq!(stats.qualified, 0);
    assert_eq!(stats.ranked, 0);
    assert_eq!(stats.published, 0);
    assert!(stats.skipped.is_empty());
}

#[tokio::test]
async fn unreachable_source_is_fatal() {
    let dir = TempDir::new().unwrap();
    let relay = relay(
        MockSearch::new().failing("connection refused"),
        MockDownloader::new(),
        MockCaptioner::new(),
        MockPublisher::new(),
        &dir,
    );

    let err = run(&relay, 10).await.unwrap_err();
    assert!(matches!(err, RelayError::SourceUnavailable(_)));
}

#[tokio::test]
async fn one_fetch_failure_skips_only_that_item() {
    let search = MockSearch::new().with_items(vec![
        video_item("one", "First #shorts", "", 300, 0, 0),
        video_item("two", "Second #shorts", "", 200, 0, 0),
        video_item("three", "Third #shorts", "", 100, 0, 0),
    ]);
    // The 2nd-ranked item's download fails.
    let downloader = MockDownloader::new().fail_on("https://www.youtube.com/shorts/two");
    let publisher = MockPublisher::new();
    let dir = TempDir::new().unwrap();
    let relay = relay(search, downloader, MockCaptioner::new(), publisher.clone(), &dir);

    let stats = run(&relay, 10).await.unwrap();

    assert_eq!(stats.fetched, 2);
    assert_eq!(stats.published, 2);
    assert_eq!(stats.skipped.len(), 1);
    assert_eq!(stats.skipped[0].id, "two");
    assert!(stats.skipped[0].reason.contains("Download failed"));

    let published = publisher.published();
    assert!(published[0].0.to_string_lossy().contains("First"));
    assert!(published[1].0.to_string_lossy().contains("Third"));
}

#[tokio::test]
async fn caption_failure_degrades_to_the_bare_title() {
    let search = MockSearch::new().with_items(vec![video_item(
        "v1",
        "Sunset timelapse #shorts",
        "",
        10,
        0,
        0,
    )]);
    let publisher = MockPublisher::new();
    let dir = TempDir::new().unwrap();
    let relay = relay(
        search,
        MockDownloader::new(),
        MockCaptioner::new().failing(),
        publisher.clone(),
        &dir,
    );

    let stats = run(&relay, 10).await.unwrap();

    assert_eq!(stats.published, 1);
    assert_eq!(stats.caption_fallbacks, 1);
    assert_eq!(stats.captions_generated, 0);
    // Caption falls back to the artifact title.
    assert_eq!(publisher.published()[0].1, "Sunset timelapse #shorts");
}

#[tokio::test]
async fn caption_prompt_uses_the_fixed_template() {
    let search =
        MockSearch::new().with_items(vec![video_item("v1", "Big wave #shorts", "", 10, 0, 0)]);
    let captioner = MockCaptioner::new();
    let dir = TempDir::new().unwrap();
    let relay = relay(
        search,
        MockDownloader::new(),
        captioner.clone(),
        MockPublisher::new(),
        &dir,
    );

    run(&relay, 10).await.unwrap();

    let prompts = captioner.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0],
        "Write a catchy caption with hashtags for a viral video titled: 'Big wave #shorts'."
    );
}

#[tokio::test]
async fn publish_failure_is_per_item() {
    let search = MockSearch::new().with_items(vec![
        video_item("a", "Alpha #shorts", "", 200, 0, 0),
        video_item("b", "Beta #shorts", "", 100, 0, 0),
    ]);
    let publisher = MockPublisher::new().fail_on_path_containing("Alpha");
    let dir = TempDir::new().unwrap();
    let relay = relay(
        search,
        MockDownloader::new(),
        MockCaptioner::new(),
        publisher.clone(),
        &dir,
    );

    let stats = run(&relay, 10).await.unwrap();

    assert_eq!(stats.published, 1);
    assert_eq!(stats.skipped.len(), 1);
    assert_eq!(stats.skipped[0].id, "a");
    assert!(stats.skipped[0].reason.contains("Publish failed"));
    assert!(publisher.published()[0].0.to_string_lossy().contains("Beta"));
}

#[tokio::test]
async fn auth_rejection_aborts_the_remaining_publishes() {
    let search = MockSearch::new().with_items(vec![
        video_item("a", "Alpha #shorts", "", 200, 0, 0),
        video_item("b", "Beta #shorts", "", 100, 0, 0),
        video_item("c", "Gamma #shorts", "", 50, 0, 0),
    ]);
    // First publish succeeds, second hits the auth rejection.
    let publisher = MockPublisher::new().auth_fail_on_attempt(1);
    let dir = TempDir::new().unwrap();
    let relay = relay(
        search,
        MockDownloader::new(),
        MockCaptioner::new(),
        publisher.clone(),
        &dir,
    );

    let err = run(&relay, 10).await.unwrap_err();

    assert!(matches!(err, RelayError::PublishAuthFailed(_)));
    assert_eq!(publisher.published().len(), 1);
}

#[tokio::test]
async fn colliding_titles_produce_distinct_artifacts() {
    let search = MockSearch::new().with_items(vec![
        video_item("id1", "Same name #shorts", "", 200, 0, 0),
        video_item("id2", "Same name #shorts", "", 100, 0, 0),
    ]);
    let publisher = MockPublisher::new();
    let dir = TempDir::new().unwrap();
    let relay = relay(
        search,
        MockDownloader::new(),
        MockCaptioner::new(),
        publisher.clone(),
        &dir,
    );

    let stats = run(&relay, 10).await.unwrap();

    assert_eq!(stats.published, 2);
    let published = publisher.published();
    assert_ne!(published[0].0, published[1].0);
    assert!(published[1].0.to_string_lossy().contains("id2"));
}

#[tokio::test]
async fn truncates_to_the_requested_count() {
    let search = MockSearch::new().with_items(vec![
        video_item("a", "A #shorts", "", 300, 0, 0),
        video_item("b", "B #shorts", "", 200, 0, 0),
        video_item("c", "C #shorts", "", 100, 0, 0),
    ]);
    let publisher = MockPublisher::new();
    let dir = TempDir::new().unwrap();
    let relay = relay(
        search,
        MockDownloader::new(),
        MockCaptioner::new(),
        publisher.clone(),
        &dir,
    );

    let stats = run(&relay, 2).await.unwrap();

    assert_eq!(stats.ranked, 2);
    assert_eq!(stats.published, 2);
    assert_eq!(publisher.published().len(), 2);
}

#[tokio::test]
async fn zero_max_results_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let relay = relay(
        MockSearch::new(),
        MockDownloader::new(),
        MockCaptioner::new(),
        MockPublisher::new(),
        &dir,
    );

    let err = run(&relay, 0).await.unwrap_err();
    assert!(matches!(err, RelayError::Config(_)));
}

#[tokio::test]
async fn shutdown_before_publishing_skips_all_jobs() {
    let search =
        MockSearch::new().with_items(vec![video_item("v1", "Clip #shorts", "", 10, 0, 0)]);
    let publisher = MockPublisher::new();
    let dir = TempDir::new().unwrap();
    let relay = relay(
        search,
        MockDownloader::new(),
        MockCaptioner::new(),
        publisher.clone(),
        &dir,
    );

    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let stats = relay.run(&params(10), rx).await.unwrap();

    assert_eq!(stats.published, 0);
    assert_eq!(stats.skipped.len(), 1);
    assert!(stats.skipped[0].reason.contains("cancelled"));
    assert!(publisher.published().is_empty());
}

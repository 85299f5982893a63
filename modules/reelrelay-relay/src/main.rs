use std::path::PathBuf;

use anyhow::Result;
use chrono::{TimeDelta, Utc};
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use instagram_client::InstagramClient;
use reelrelay_common::Config;
use reelrelay_relay::captioner::CompletionCaptioner;
use reelrelay_relay::downloader::YtDlpDownloader;
use reelrelay_relay::relay::{Relay, RunParams};
use reelrelay_relay::scheduling::TopOfNextHour;
use youtube_client::YouTubeClient;

#[derive(Parser, Debug)]
#[command(
    name = "reelrelay",
    about = "Discover, rank and republish trending short-form videos"
)]
struct Cli {
    /// Topic to search for (overrides SEARCH_QUERY)
    #[arg(long)]
    query: Option<String>,

    /// How many days back to look (overrides DAYS_AGO)
    #[arg(long)]
    days_ago: Option<i64>,

    /// Maximum candidates to process (overrides MAX_RESULTS)
    #[arg(long)]
    max_results: Option<usize>,

    /// Where downloaded clips land (overrides DOWNLOAD_DIR)
    #[arg(long)]
    download_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reelrelay=info".parse()?))
        .init();

    info!("ReelRelay starting...");

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(query) = cli.query {
        config.search_query = query;
    }
    if let Some(days_ago) = cli.days_ago {
        config.days_ago = days_ago;
    }
    if let Some(max_results) = cli.max_results {
        config.max_results = max_results;
    }
    if let Some(download_dir) = cli.download_dir {
        config.download_dir = download_dir;
    }
    config.log_redacted();

    // Ctrl-C flips the shutdown flag; the driver releases any held wait
    // timer and skips the remaining publishes.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, aborting between stages");
            let _ = shutdown_tx.send(true);
        }
    });

    let relay = Relay::new(
        YouTubeClient::new(config.youtube_api_key.clone()),
        YtDlpDownloader::new(),
        CompletionCaptioner::new(
            &config.caption_api_key,
            &config.caption_api_base_url,
            &config.caption_model,
        ),
        InstagramClient::new(
            config.instagram_access_token.clone(),
            config.instagram_account_id.clone(),
        ),
        Box::new(TopOfNextHour),
        config.download_dir.clone(),
    );

    let params = RunParams {
        query: config.search_query.clone(),
        published_after: Utc::now() - TimeDelta::days(config.days_ago),
        max_results: config.max_results,
    };

    let stats = relay.run(&params, shutdown_rx).await?;
    info!("Relay run complete. {stats}");

    Ok(())
}

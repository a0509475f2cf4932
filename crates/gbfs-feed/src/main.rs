//! Probe binary for the GBFS feed cache.
//!
//! Initializes logging, loads configuration, performs the startup
//! self-check against the live feed, and prints one complete snapshot as
//! JSON. The HTTP presentation layer consumes the same
//! [`StationSource`](gbfs_feed::StationSource) contract; this binary
//! exists to validate a deployment's configuration and upstream
//! reachability from the command line.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gbfs_feed::{FeedConfig, HttpFeedClient, LiveSource};

/// Upper bound on the startup self-check.
const SELF_CHECK_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("gbfs-probe starting");

    // Load configuration from the file named by GBFS_CONFIG, or fall back
    // to defaults (the Oslo deployment).
    let config = match std::env::var("GBFS_CONFIG") {
        Ok(path) => FeedConfig::from_file(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        Err(_) => {
            let mut config = FeedConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    info!(
        api_prefix = config.api_prefix,
        soft_threshold_secs = config.soft_threshold_secs,
        hard_threshold_secs = config.hard_threshold_secs,
        "configuration loaded"
    );

    let client = HttpFeedClient::new(&config).context("building feed client")?;
    let source = LiveSource::new(client, &config).context("building live source")?;

    // Pull once before doing anything else, to fail fast if the upstream
    // is unreachable.
    source
        .self_check(SELF_CHECK_TIMEOUT)
        .await
        .context("startup self-check failed")?;
    info!("self-check passed");

    let stations = source.get_all_stations(None).await?;
    info!(stations = stations.len(), "snapshot ready");

    println!("{}", serde_json::to_string_pretty(&stations)?);
    Ok(())
}

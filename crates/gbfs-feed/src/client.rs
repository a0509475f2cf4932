//! Upstream feed retrieval.
//!
//! [`FeedClient`] is the seam between the refresh machinery and the
//! network. Production uses [`HttpFeedClient`] over `reqwest`; tests plug
//! in scripted in-memory feeds. The trait methods return `impl Future`
//! rather than being declared `async fn` so the `Send` bound can be stated
//! (async trait methods are not dyn-compatible either way; the coordinator
//! takes the client as a generic parameter).

use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::debug;

use gbfs_types::{InfoFeed, InfoRecord, StatusFeed, StatusRecord};

use crate::config::FeedConfig;
use crate::error::ClientError;

/// Path of the status document under the feed prefix.
const STATUS_PATH: &str = "/station_status.json";

/// Path of the information document under the feed prefix.
const INFO_PATH: &str = "/station_information.json";

/// A source of the two record collections that make up the feed.
pub trait FeedClient: Send + Sync + 'static {
    /// Retrieve the mutable status half of the feed.
    fn fetch_status(
        &self,
    ) -> impl Future<Output = Result<Vec<StatusRecord>, ClientError>> + Send;

    /// Retrieve the near-static information half of the feed.
    fn fetch_info(&self) -> impl Future<Output = Result<Vec<InfoRecord>, ClientError>> + Send;
}

/// Feed client performing HTTP GET requests against a configured endpoint
/// prefix.
///
/// The underlying `reqwest` client carries the configured request timeout,
/// so every retrieval has a fixed transport-level upper bound in addition
/// to whatever deadline the caller imposes.
#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    client: reqwest::Client,
    api_prefix: String,
    client_identifier: String,
}

impl HttpFeedClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be
    /// constructed (TLS backend initialization failure).
    pub fn new(config: &FeedConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.network_timeout())
            .build()?;
        Ok(Self {
            client,
            api_prefix: config.api_prefix.trim_end_matches('/').to_owned(),
            client_identifier: config.client_identifier.clone(),
        })
    }

    /// GET one feed document and decode it.
    async fn get_feed<T: DeserializeOwned>(&self, url: String) -> Result<T, ClientError> {
        let started = tokio::time::Instant::now();
        debug!(url, "fetching feed document");

        let response = self
            .client
            .get(&url)
            .header("Client-Identifier", &self.client_identifier)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UpstreamStatus { status, url });
        }

        let body = response.text().await?;
        let feed = serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            url: url.clone(),
            source,
        })?;

        debug!(url, elapsed = ?started.elapsed(), "feed document fetched");
        Ok(feed)
    }
}

impl FeedClient for HttpFeedClient {
    async fn fetch_status(&self) -> Result<Vec<StatusRecord>, ClientError> {
        let url = format!("{}{STATUS_PATH}", self.api_prefix);
        let feed: StatusFeed = self.get_feed(url).await?;
        Ok(feed.data.stations)
    }

    async fn fetch_info(&self) -> Result<Vec<InfoRecord>, ClientError> {
        let url = format!("{}{INFO_PATH}", self.api_prefix);
        let feed: InfoFeed = self.get_feed(url).await?;
        Ok(feed.data.stations)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_prefix() {
        let config = FeedConfig {
            api_prefix: "https://gbfs.example.org/testville/".to_owned(),
            ..FeedConfig::default()
        };
        let client = HttpFeedClient::new(&config).unwrap();
        assert_eq!(client.api_prefix, "https://gbfs.example.org/testville");
    }
}

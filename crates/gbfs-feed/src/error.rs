//! Error types for the feed cache.
//!
//! Uses `thiserror` for typed errors. [`ClientError`] covers one upstream
//! retrieval; [`FeedError`] is what callers of the cache see. A refresh
//! failure always names the half that failed, because the two documents
//! are served by independent endpoints and debugging starts with knowing
//! which one broke.

use gbfs_types::StationId;

/// Errors from a single upstream feed retrieval.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a non-success status code.
    #[error("upstream returned {status} for {url}")]
    UpstreamStatus {
        /// The HTTP status code received.
        status: reqwest::StatusCode,
        /// The URL that was requested.
        url: String,
    },

    /// The response body was not a valid feed document.
    #[error("failed to decode feed document from {url}: {source}")]
    Decode {
        /// The URL whose body failed to decode.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by the feed cache to its callers.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The status half of a refresh failed.
    #[error("error fetching station status: {source}")]
    StatusFetch {
        /// The underlying retrieval error.
        #[source]
        source: ClientError,
    },

    /// The information half of a refresh failed.
    #[error("error fetching station information: {source}")]
    InfoFetch {
        /// The underlying retrieval error.
        #[source]
        source: ClientError,
    },

    /// The caller's deadline expired while waiting for a refresh.
    ///
    /// This is the only error a reader blocked on hard staleness can see:
    /// refresh failures themselves are logged and retried, never surfaced
    /// to waiting readers.
    #[error("deadline exceeded while waiting for a feed refresh")]
    DeadlineExceeded,

    /// A lookup referenced a station id not present in the dataset.
    #[error("no such station {0}")]
    UnknownStation(StationId),
}

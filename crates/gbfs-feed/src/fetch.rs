//! Concurrent fan-out to the two upstream feed endpoints.

use gbfs_types::{InfoRecord, StatusRecord};

use crate::client::FeedClient;
use crate::error::FeedError;

/// Pull both halves of the feed concurrently.
///
/// The two retrievals run in parallel and both are awaited before the
/// outcome is decided; a failure of the status half is reported ahead of a
/// failure of the information half, and the error always names which half
/// broke. Either both collections are returned or the call fails -- no
/// partial result ever escapes.
pub async fn fetch_both<C: FeedClient>(
    client: &C,
) -> Result<(Vec<StatusRecord>, Vec<InfoRecord>), FeedError> {
    let (status, info) = tokio::join!(client.fetch_status(), client.fetch_info());

    let status = status.map_err(|source| FeedError::StatusFetch { source })?;
    let info = info.map_err(|source| FeedError::InfoFetch { source })?;

    Ok((status, info))
}

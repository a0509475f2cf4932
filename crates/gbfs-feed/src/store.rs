//! In-memory dataset store with freshness tracking.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

use gbfs_types::{Dataset, InfoRecord, Station, StationId, StatusRecord};

use crate::merge::{PartialStation, merge_records};

/// Holds the merged dataset and the time of the last successful merge.
///
/// The store itself is not synchronized. The coordinator wraps it in the
/// single mutex that also guards the refresh-in-flight flag, so the
/// dataset and the timestamp can only ever change together, and the
/// timestamp only moves when a merge has actually happened.
#[derive(Debug, Default)]
pub struct Store {
    dataset: BTreeMap<StationId, PartialStation>,
    last_completed_update: Option<Instant>,
}

impl Store {
    /// Create an empty store with no completed update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a freshly fetched pull into the dataset and advance the update
    /// timestamp.
    ///
    /// [`Instant`] is monotonic, so the timestamp is non-decreasing across
    /// any sequence of integrations.
    pub fn integrate(&mut self, status: Vec<StatusRecord>, info: Vec<InfoRecord>) {
        merge_records(&mut self.dataset, status, info);
        self.last_completed_update = Some(Instant::now());
    }

    /// Complete-only copy of the dataset, plus the ids skipped because one
    /// half is still missing.
    ///
    /// Logging the skips is the caller's business; the store stays pure.
    pub fn snapshot(&self) -> (Dataset, Vec<StationId>) {
        let mut complete = Dataset::new();
        let mut skipped = Vec::new();

        for (id, station) in &self.dataset {
            if let (Some(status), Some(info)) = (&station.status, &station.info) {
                complete.insert(
                    id.clone(),
                    Station {
                        status: status.clone(),
                        info: info.clone(),
                    },
                );
            } else {
                skipped.push(id.clone());
            }
        }

        (complete, skipped)
    }

    /// Elapsed time since the last successful merge, or `None` if no merge
    /// has completed yet (staleness is unbounded until the first pull).
    pub fn staleness(&self, now: Instant) -> Option<Duration> {
        self.last_completed_update
            .map(|at| now.saturating_duration_since(at))
    }

    /// Timestamp of the last completed update, if any.
    pub const fn last_completed_update(&self) -> Option<Instant> {
        self.last_completed_update
    }
}

//! File-backed station source for tests and offline development.
//!
//! Reads both feed documents once from local JSON files and serves the
//! resulting dataset unchanged forever. Unlike the live feed, a fixture is
//! expected to be a complete, curated dataset, so a station with only one
//! half present is a construction error rather than something to skip.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::time::Instant;

use gbfs_types::{Dataset, InfoFeed, Station, StationId, StatusFeed};

use crate::error::FeedError;
use crate::merge::{PartialStation, merge_records};
use crate::source::StationSource;

/// Errors that can occur while building a fixture source.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// A fixture file could not be read.
    #[error("failed to read fixture file {path}: {source}")]
    Io {
        /// Path of the offending file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A fixture file was not a valid feed document.
    #[error("failed to parse fixture file {path}: {source}")]
    Parse {
        /// Path of the offending file.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A station appeared in only one of the two documents.
    #[error("station {0} is missing either status or information")]
    IncompleteStation(StationId),
}

/// Station source built from two local feed documents.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dataset: Dataset,
}

impl FixtureSource {
    /// Build a source from a status document and an information document.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Io`] or [`FixtureError::Parse`] if either
    /// file cannot be read or decoded, and
    /// [`FixtureError::IncompleteStation`] if any station ends up with
    /// only one half.
    pub fn from_files(status_path: &Path, info_path: &Path) -> Result<Self, FixtureError> {
        let status: StatusFeed = read_feed(status_path)?;
        let info: InfoFeed = read_feed(info_path)?;

        let mut merged: BTreeMap<StationId, PartialStation> = BTreeMap::new();
        merge_records(&mut merged, status.data.stations, info.data.stations);

        let mut dataset = Dataset::new();
        for (id, station) in merged {
            match (station.status, station.info) {
                (Some(status), Some(info)) => {
                    dataset.insert(id, Station { status, info });
                }
                _ => return Err(FixtureError::IncompleteStation(id)),
            }
        }

        Ok(Self { dataset })
    }

    /// The parsed dataset.
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl StationSource for FixtureSource {
    async fn get_all_stations(&self, _deadline: Option<Instant>) -> Result<Dataset, FeedError> {
        Ok(self.dataset.clone())
    }
}

/// Read and decode one feed document from disk.
fn read_feed<T: DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| FixtureError::Parse {
        path: path.display().to_string(),
        source,
    })
}

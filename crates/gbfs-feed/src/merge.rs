//! Folding freshly fetched records into the keyed dataset.
//!
//! The merge is a pure upsert: every record overwrites its half of the
//! corresponding station wholesale, creating the station entry on demand.
//! It runs only under the store's lock and cannot fail -- malformed input
//! is rejected earlier, at deserialization.

use std::collections::BTreeMap;

use gbfs_types::{InfoRecord, StationId, StatusRecord};

/// A station as accumulated by the merge.
///
/// Either half may be missing until the corresponding record has been seen
/// at least once. Incomplete entries stay internal to the store; snapshots
/// only expose stations with both halves present.
#[derive(Debug, Clone, Default)]
pub struct PartialStation {
    /// Mutable availability half, if any pull has carried it yet.
    pub status: Option<StatusRecord>,
    /// Near-static identity half, if any pull has carried it yet.
    pub info: Option<InfoRecord>,
}

impl PartialStation {
    /// Whether both halves are present.
    pub const fn is_complete(&self) -> bool {
        self.status.is_some() && self.info.is_some()
    }
}

/// Upsert both record collections into the dataset.
///
/// Stations present in the dataset but absent from the new pull are left
/// untouched. The upstream feed occasionally omits stations transiently,
/// and removing them here would make previously complete stations flicker
/// out of snapshots.
pub fn merge_records(
    dataset: &mut BTreeMap<StationId, PartialStation>,
    status_records: Vec<StatusRecord>,
    info_records: Vec<InfoRecord>,
) {
    for record in status_records {
        let entry = dataset.entry(record.station_id.clone()).or_default();
        entry.status = Some(record);
    }

    for record in info_records {
        let entry = dataset.entry(record.station_id.clone()).or_default();
        entry.info = Some(record);
    }
}

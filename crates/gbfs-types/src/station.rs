//! The complete station pairing and the dataset served to consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::StationId;
use crate::records::{InfoRecord, StatusRecord};

/// A complete station: one record from each half of the feed.
///
/// Completeness is enforced by the type. While a refresh is accumulating
/// halves a station may internally exist with only one record, but such
/// entries never cross this boundary -- a reader either sees both halves
/// or does not see the station at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Mutable availability half.
    pub status: StatusRecord,
    /// Near-static identity half.
    pub info: InfoRecord,
}

/// The complete-only dataset handed to readers, keyed by station id.
///
/// A `BTreeMap` keeps iteration (and therefore serialized output)
/// deterministic.
pub type Dataset = BTreeMap<StationId, Station>;

//! Wire-format records for the two halves of the upstream station feed.
//!
//! The feed publishes two JSON documents under a common endpoint prefix:
//! `station_status.json` (mutable availability) and
//! `station_information.json` (near-static identity). Both use the same
//! envelope: a `data.stations` array plus feed-level metadata. Each record
//! is replaced wholesale on every refresh; nothing in here is merged
//! field-by-field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::StationId;

/// Per-station mutable attributes from `station_status.json`.
///
/// The operational flags keep the upstream 0/1 encoding rather than
/// mapping to `bool`: the feed specification allows the values to grow
/// (and some producers send other integers), and consumers expect the
/// field to round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Station this record describes.
    pub station_id: StationId,
    /// Bikes currently available for rental.
    pub num_bikes_available: u32,
    /// Free docks currently available for returns.
    pub num_docks_available: u32,
    /// 1 when the station is physically installed.
    pub is_installed: u8,
    /// 1 when the station is renting bikes.
    pub is_renting: u8,
    /// 1 when the station is accepting returns.
    pub is_returning: u8,
    /// When the station last reported its state (POSIX seconds on the wire).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub last_reported: DateTime<Utc>,
}

/// Per-station near-static attributes from `station_information.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoRecord {
    /// Station this record describes.
    pub station_id: StationId,
    /// Human-readable station name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Total number of docks at the station.
    pub capacity: u32,
}

/// Envelope shared by both feed documents.
#[derive(Debug, Clone, Deserialize)]
pub struct Feed<T> {
    /// The payload wrapper.
    pub data: FeedData<T>,
    /// When the producer generated the document (POSIX seconds).
    pub last_updated: i64,
    /// Seconds the producer suggests the document stays valid.
    pub ttl: u32,
}

/// Payload wrapper inside a feed envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedData<T> {
    /// The station records carried by this document.
    pub stations: Vec<T>,
}

/// The status half of the feed.
pub type StatusFeed = Feed<StatusRecord>;

/// The information half of the feed.
pub type InfoFeed = Feed<InfoRecord>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn parses_status_document() {
        let body = r#"{
            "last_updated": 1540219230,
            "ttl": 10,
            "data": {
                "stations": [{
                    "station_id": "175",
                    "is_installed": 1,
                    "is_renting": 1,
                    "is_returning": 1,
                    "last_reported": 1540219230,
                    "num_bikes_available": 7,
                    "num_docks_available": 5
                }]
            }
        }"#;

        let feed: StatusFeed = serde_json::from_str(body).unwrap();
        assert_eq!(feed.ttl, 10);
        assert_eq!(feed.data.stations.len(), 1);

        let record = feed.data.stations.first().unwrap();
        assert_eq!(record.station_id, StationId::new("175"));
        assert_eq!(record.num_bikes_available, 7);
        assert_eq!(record.last_reported.year(), 2018);
    }

    #[test]
    fn parses_information_document() {
        let body = r#"{
            "last_updated": 1540219230,
            "ttl": 10,
            "data": {
                "stations": [{
                    "station_id": "627",
                    "name": "Skøyen Stasjon",
                    "address": "Skøyen Stasjon",
                    "lat": 59.9226729,
                    "lon": 10.6788129,
                    "capacity": 20
                }]
            }
        }"#;

        let feed: InfoFeed = serde_json::from_str(body).unwrap();
        let record = feed.data.stations.first().unwrap();
        assert_eq!(record.name, "Skøyen Stasjon");
        assert_eq!(record.capacity, 20);
    }

    #[test]
    fn status_record_roundtrips_through_json() {
        let body = r#"{
            "station_id": "1",
            "is_installed": 1,
            "is_renting": 0,
            "is_returning": 1,
            "last_reported": 1540219230,
            "num_bikes_available": 0,
            "num_docks_available": 30
        }"#;

        let record: StatusRecord = serde_json::from_str(body).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: StatusRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

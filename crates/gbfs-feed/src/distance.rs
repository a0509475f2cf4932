//! Great-circle distances between stations.
//!
//! Serves the distance listing consumed by the presentation layer: given
//! an origin station, the distance in kilometres from it to every station
//! in a snapshot.

use std::collections::BTreeMap;

use gbfs_types::{Dataset, StationId};

use crate::error::FeedError;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance in kilometres from the origin station to every station in the
/// dataset (the origin itself included, at distance zero).
///
/// # Errors
///
/// Returns [`FeedError::UnknownStation`] if `origin` is not present in the
/// dataset.
pub fn distances_from(
    dataset: &Dataset,
    origin: &StationId,
) -> Result<BTreeMap<StationId, f64>, FeedError> {
    let origin_station = dataset
        .get(origin)
        .ok_or_else(|| FeedError::UnknownStation(origin.clone()))?;

    let (lat0, lon0) = (origin_station.info.lat, origin_station.info.lon);
    Ok(dataset
        .iter()
        .map(|(id, station)| {
            let km = haversine_km(lat0, lon0, station.info.lat, station.info.lon);
            (id.clone(), km)
        })
        .collect())
}

/// Haversine great-circle distance between two coordinates, in kilometres.
fn haversine_km(lat0: f64, lon0: f64, lat1: f64, lon1: f64) -> f64 {
    let delta_lat = (lat1 - lat0).to_radians();
    let delta_lon = (lon1 - lon0).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat0.to_radians().cos() * lat1.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use gbfs_types::{InfoRecord, Station, StatusRecord};

    use super::*;

    fn station(id: &str, lat: f64, lon: f64) -> (StationId, Station) {
        let station_id = StationId::new(id);
        (
            station_id.clone(),
            Station {
                status: StatusRecord {
                    station_id: station_id.clone(),
                    num_bikes_available: 1,
                    num_docks_available: 1,
                    is_installed: 1,
                    is_renting: 1,
                    is_returning: 1,
                    last_reported: Utc.timestamp_opt(1_540_219_230, 0).unwrap(),
                },
                info: InfoRecord {
                    station_id,
                    name: id.to_owned(),
                    address: id.to_owned(),
                    lat,
                    lon,
                    capacity: 10,
                },
            },
        )
    }

    #[test]
    fn origin_distance_is_zero() {
        let dataset: Dataset = [station("a", 59.9139, 10.7522)].into_iter().collect();
        let distances = distances_from(&dataset, &StationId::new("a")).unwrap();
        assert!(distances.get(&StationId::new("a")).unwrap().abs() < 1e-9);
    }

    #[test]
    fn computes_known_distance() {
        // Oslo Central Station to Majorstuen is roughly 3.2 km.
        let dataset: Dataset = [
            station("central", 59.9111, 10.7528),
            station("majorstuen", 59.9294, 10.7145),
        ]
        .into_iter()
        .collect();

        let distances = distances_from(&dataset, &StationId::new("central")).unwrap();
        let km = *distances.get(&StationId::new("majorstuen")).unwrap();
        assert!((2.5..4.0).contains(&km), "unexpected distance: {km}");
    }

    #[test]
    fn unknown_origin_is_an_error() {
        let dataset: Dataset = [station("a", 59.9, 10.7)].into_iter().collect();
        let result = distances_from(&dataset, &StationId::new("missing"));
        assert!(matches!(result, Err(FeedError::UnknownStation(_))));
    }
}

use crate::reference::grid_table::GridTable;
use crate::stations::error::LocateStationError;
use crate::types::station::GridStation;
use haversine::{distance, Location as HaversineLocation, Units};
use log::debug;
use ordered_float::OrderedFloat;
use rstar::{RTree, RTreeObject, AABB};

/// Default half-width of the search box, in degrees.
pub const DEFAULT_SEARCH_RADIUS_DEGREES: f64 = 0.05;

/// How candidate stations are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Euclidean distance in degrees, treating lat/lon as a flat plane.
    /// Cheap and adequate at grid scale, but not geodesically accurate.
    #[default]
    Planar,
    /// Great-circle distance in kilometres.
    Haversine,
}

impl DistanceMetric {
    fn measure(self, lat: f64, lon: f64, station: &GridStation) -> f64 {
        match self {
            DistanceMetric::Planar => {
                ((lat - station.latitude).powi(2) + (lon - station.longitude).powi(2)).sqrt()
            }
            DistanceMetric::Haversine => distance(
                HaversineLocation {
                    latitude: lat,
                    longitude: lon,
                },
                HaversineLocation {
                    latitude: station.latitude,
                    longitude: station.longitude,
                },
                Units::Kilometers,
            ),
        }
    }
}

// Grid station tagged with its row in the table so ties keep table order.
#[derive(Debug, Clone)]
struct IndexedStation {
    row: usize,
    station: GridStation,
}

impl RTreeObject for IndexedStation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.station.latitude, self.station.longitude])
    }
}

/// Nearest-station lookup over the grid table.
#[derive(Debug, Clone)]
pub struct StationLocator {
    rtree: RTree<IndexedStation>,
}

impl StationLocator {
    pub fn new(grid: &GridTable) -> Self {
        let stations = grid
            .iter()
            .enumerate()
            .map(|(row, station)| IndexedStation {
                row,
                station: *station,
            })
            .collect();
        StationLocator {
            rtree: RTree::bulk_load(stations),
        }
    }

    /// Checks that a coordinate is usable as a WGS84 position. Longitudes up to
    /// 360 are accepted for grids expressed in 0..360 east.
    pub fn validate_coordinate(lat: f64, lon: f64) -> Result<(), LocateStationError> {
        if (-90.0 < lat && lat < 90.0) && (-180.0 < lon && lon < 360.0) {
            Ok(())
        } else {
            Err(LocateStationError::InvalidCoordinate { lat, lon })
        }
    }

    /// All stations inside the box `[lat ± radius] x [lon ± radius]` (inclusive),
    /// sorted by distance ascending. Equal distances keep grid table order.
    pub fn query(
        &self,
        lat: f64,
        lon: f64,
        radius_degrees: f64,
        metric: DistanceMetric,
    ) -> Result<Vec<(GridStation, f64)>, LocateStationError> {
        Self::validate_coordinate(lat, lon)?;
        if !radius_degrees.is_finite() || radius_degrees < 0.0 {
            return Err(LocateStationError::InvalidRadius(radius_degrees));
        }

        let search_box = AABB::from_corners(
            [lat - radius_degrees, lon - radius_degrees],
            [lat + radius_degrees, lon + radius_degrees],
        );

        let mut candidates: Vec<(OrderedFloat<f64>, usize, GridStation)> = self
            .rtree
            .locate_in_envelope(&search_box)
            .map(|c| {
                (
                    OrderedFloat(metric.measure(lat, lon, &c.station)),
                    c.row,
                    c.station,
                )
            })
            .collect();
        candidates.sort_by_key(|(dist, row, _)| (*dist, *row));

        Ok(candidates
            .into_iter()
            .map(|(dist, _, station)| (station, dist.into_inner()))
            .collect())
    }

    /// Id of the closest station in the search box.
    ///
    /// # Errors
    ///
    /// [`LocateStationError::InvalidCoordinate`] for out-of-range input, checked
    /// before any lookup; [`LocateStationError::NotFound`] when the box is empty.
    pub fn nearest_station(
        &self,
        lat: f64,
        lon: f64,
        radius_degrees: f64,
        metric: DistanceMetric,
    ) -> Result<i64, LocateStationError> {
        let candidates = self.query(lat, lon, radius_degrees, metric)?;
        let (station, dist) =
            candidates
                .first()
                .ok_or(LocateStationError::NotFound {
                    lat,
                    lon,
                    radius: radius_degrees,
                })?;
        debug!(
            "Nearest station to ({}, {}) is {} at distance {:.5} ({} candidates)",
            lat,
            lon,
            station.id,
            dist,
            candidates.len()
        );
        Ok(station.id)
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: i64, latitude: f64, longitude: f64) -> GridStation {
        GridStation {
            id,
            latitude,
            longitude,
        }
    }

    fn locator(stations: Vec<GridStation>) -> StationLocator {
        StationLocator::new(&GridTable::from_stations(stations))
    }

    // Brute force reference: bounding box then minimal planar distance, first row on ties.
    fn brute_force(stations: &[GridStation], lat: f64, lon: f64, r: f64) -> Option<i64> {
        let mut best: Option<(f64, i64)> = None;
        for s in stations {
            let inside = (lon - r..=lon + r).contains(&s.longitude)
                && (lat - r..=lat + r).contains(&s.latitude);
            if !inside {
                continue;
            }
            let d = ((lat - s.latitude).powi(2) + (lon - s.longitude).powi(2)).sqrt();
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, s.id));
            }
        }
        best.map(|(_, id)| id)
    }

    #[test]
    fn picks_closest_in_box() {
        let loc = locator(vec![
            station(1, -41.30, 174.80),
            station(2, -41.28, 174.78),
            station(3, -41.20, 174.70),
        ]);
        let id = loc
            .nearest_station(-41.2865, 174.7762, DEFAULT_SEARCH_RADIUS_DEGREES, DistanceMetric::Planar)
            .unwrap();
        assert_eq!(id, 2);
    }

    #[test]
    fn ties_keep_table_order() {
        // Offsets are powers of two so all three distances are exactly equal.
        let loc = locator(vec![
            station(20, 0.0, -0.03125),
            station(10, 0.0, 0.03125),
            station(30, -0.03125, 0.0),
        ]);
        let results = loc.query(0.0, 0.0, 0.05, DistanceMetric::Planar).unwrap();
        let ids: Vec<i64> = results.iter().map(|(s, _)| s.id).collect();
        assert_eq!(ids, [20, 10, 30]);
        assert_eq!(
            loc.nearest_station(0.0, 0.0, 0.05, DistanceMetric::Planar),
            Ok(20)
        );
    }

    #[test]
    fn box_boundary_is_inclusive() {
        let loc = locator(vec![station(7, 0.5, 100.5)]);
        assert_eq!(
            loc.nearest_station(0.0, 100.0, 0.5, DistanceMetric::Planar),
            Ok(7)
        );
    }

    #[test]
    fn corner_outside_radius_still_counts_in_box() {
        // The prefilter is a box, not a circle: a corner station is a candidate
        // even though its planar distance exceeds the radius.
        let loc = locator(vec![station(5, -41.04, 174.04)]);
        assert_eq!(
            loc.nearest_station(-41.0, 174.0, 0.05, DistanceMetric::Planar),
            Ok(5)
        );
    }

    #[test]
    fn empty_box_is_not_found() {
        let loc = locator(vec![station(1, -45.0, 170.0)]);
        assert_eq!(
            loc.nearest_station(-41.0, 174.0, 0.05, DistanceMetric::Planar),
            Err(LocateStationError::NotFound {
                lat: -41.0,
                lon: 174.0,
                radius: 0.05
            })
        );
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let loc = locator(vec![station(1, 0.0, 0.0)]);
        for (lat, lon) in [(91.0, 0.0), (0.0, 400.0), (-90.0, 0.0), (0.0, -180.0), (f64::NAN, 0.0)] {
            assert!(matches!(
                loc.nearest_station(lat, lon, 0.05, DistanceMetric::Planar),
                Err(LocateStationError::InvalidCoordinate { .. })
            ));
        }
    }

    #[test]
    fn negative_radius_is_rejected() {
        let loc = locator(vec![station(1, 0.0, 0.0)]);
        assert_eq!(
            loc.query(0.0, 0.0, -1.0, DistanceMetric::Planar),
            Err(LocateStationError::InvalidRadius(-1.0))
        );
    }

    #[test]
    fn haversine_metric_reports_kilometres() {
        let loc = locator(vec![station(1, -41.0, 174.0), station(2, -41.01, 174.0)]);
        let results = loc.query(-41.0, 174.0, 0.05, DistanceMetric::Haversine).unwrap();
        assert_eq!(results[0].0.id, 1);
        assert!(results[0].1.abs() < 1e-9);
        // 0.01 degrees of latitude is roughly 1.1 km
        assert!((results[1].1 - 1.11).abs() < 0.05);
    }

    #[test]
    fn matches_brute_force_on_a_grid() {
        let mut stations = Vec::new();
        let mut id = 0;
        for i in 0..40 {
            for j in 0..40 {
                id += 1;
                stations.push(station(id, -42.0 + i as f64 * 0.05, 172.0 + j as f64 * 0.05));
            }
        }
        let loc = locator(stations.clone());
        let probes = [
            (-41.2865, 172.7762),
            (-40.9999, 173.0001),
            (-41.5, 172.5),
            (-42.1, 171.95),
            (-40.0, 172.0),
        ];
        for (lat, lon) in probes {
            let expected = brute_force(&stations, lat, lon, 0.05);
            let actual = loc.nearest_station(lat, lon, 0.05, DistanceMetric::Planar).ok();
            assert_eq!(actual, expected, "probe ({}, {})", lat, lon);
        }
    }
}

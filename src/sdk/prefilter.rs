//! Coarse candidate selection by great-circle distance.
//!
//! The refinement stage calls the routing provider once per candidate, so the
//! dataset is first cut down to a small over-sampled set of geodesically
//! nearest units.

use geo::{Distance, Haversine, Point};
use std::cmp::Ordering;

use super::dataset::PollingUnit;
use super::query::{GeoPoint, QueryPoint};

/// Candidates kept per requested result.
pub const OVERSAMPLE_FACTOR: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct GeodesicMatch<'a> {
    pub unit: &'a PollingUnit,
    pub geodesic_distance_m: f64,
}

/// Haversine distance in metres.
pub fn geodesic_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    Haversine.distance(Point::new(a.lon, a.lat), Point::new(b.lon, b.lat))
}

/// Returns the `min(k * OVERSAMPLE_FACTOR, units.len())` units nearest to
/// `query`, ascending by distance with ties in dataset order.
pub fn prefilter<'a>(query: &QueryPoint, units: &'a [PollingUnit], k: usize) -> Vec<GeodesicMatch<'a>> {
    let take = k.saturating_mul(OVERSAMPLE_FACTOR).min(units.len());
    if take == 0 {
        return Vec::new();
    }

    let origin = query.location();
    let mut scored: Vec<(usize, f64)> = units
        .iter()
        .enumerate()
        .map(|(idx, unit)| (idx, geodesic_distance_m(origin, unit.location)))
        .collect();

    if take < scored.len() {
        scored.select_nth_unstable_by(take - 1, by_distance_then_index);
        scored.truncate(take);
    }
    scored.sort_unstable_by(by_distance_then_index);

    scored
        .into_iter()
        .map(|(idx, distance)| GeodesicMatch {
            unit: &units[idx],
            geodesic_distance_m: distance,
        })
        .collect()
}

fn by_distance_then_index(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0))
}

//! Road-network refinement of pre-filtered candidates.

use geojson::Feature;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::dataset::PollingUnit;
use super::prefilter::GeodesicMatch;
use super::query::{GeoPoint, QueryPoint};
use super::routing::{RouteSummary, RoutingError, RoutingProvider};

/// A unit under consideration, with both distance metrics.
///
/// A failed routing call leaves `road_distance_m` and `road_duration_s` at
/// `f64::INFINITY` and `route` empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate<'a> {
    pub unit: &'a PollingUnit,
    pub geodesic_distance_m: f64,
    pub road_distance_m: f64,
    pub road_duration_s: f64,
    pub route: Option<Feature>,
}

impl<'a> Candidate<'a> {
    pub fn routed(found: GeodesicMatch<'a>, summary: RouteSummary) -> Self {
        Self {
            unit: found.unit,
            geodesic_distance_m: found.geodesic_distance_m,
            road_distance_m: summary.distance_m,
            road_duration_s: summary.duration_s,
            route: Some(summary.route),
        }
    }

    pub fn unreachable(found: GeodesicMatch<'a>) -> Self {
        Self {
            unit: found.unit,
            geodesic_distance_m: found.geodesic_distance_m,
            road_distance_m: f64::INFINITY,
            road_duration_s: f64::INFINITY,
            route: None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.road_distance_m.is_finite()
    }
}

/// Shared flag a caller trips to abandon a query.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Routes from `query` to every candidate on `pool`.
///
/// Output is 1:1 and in the same order as `candidates`. Provider failures are
/// logged and turned into unreachable candidates; they never abort the batch.
/// Calls that have not reached the network when `cancel` trips are skipped,
/// including ones queued behind the provider's rate limit.
pub fn refine<'a>(
    provider: &dyn RoutingProvider,
    pool: &ThreadPool,
    query: &QueryPoint,
    candidates: &[GeodesicMatch<'a>],
    cancel: &CancelToken,
) -> Vec<Candidate<'a>> {
    let origin = query.location();
    pool.install(|| {
        candidates
            .par_iter()
            .map(|found| refine_one(provider, origin, *found, cancel))
            .collect()
    })
}

fn refine_one<'a>(
    provider: &dyn RoutingProvider,
    origin: GeoPoint,
    found: GeodesicMatch<'a>,
    cancel: &CancelToken,
) -> Candidate<'a> {
    if cancel.is_cancelled() {
        log::debug!("Skipping {} (#{}): query cancelled", found.unit.name, found.unit.id);
        return Candidate::unreachable(found);
    }

    match provider.get_directions_cancellable(origin, found.unit.location, cancel) {
        Ok(summary) => {
            log::debug!(
                "[ROUTED] {} (#{}): {:.0} m, {:.0} s",
                found.unit.name,
                found.unit.id,
                summary.distance_m,
                summary.duration_s
            );
            Candidate::routed(found, summary)
        }
        Err(RoutingError::Cancelled) => {
            log::debug!("Dropped {} (#{}): query cancelled", found.unit.name, found.unit.id);
            Candidate::unreachable(found)
        }
        Err(err) => {
            log::warn!(
                "Routing to {} (#{}) failed, ranking it last: {}",
                found.unit.name,
                found.unit.id,
                err
            );
            Candidate::unreachable(found)
        }
    }
}

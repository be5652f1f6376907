//! Nearest polling unit resolution: geodesic pre-filter, road refinement, ranking.

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use super::dataset::PollingUnitStore;
use super::prefilter::prefilter;
use super::query::{NearestQuery, QueryError};
use super::rank::{rank, ResultSet};
use super::refine::{refine, CancelToken};
use super::routing::RoutingProvider;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("Query was cancelled")]
    Cancelled,

    #[error("Failed to start routing workers: {0}")]
    WorkerPool(#[from] ThreadPoolBuildError),
}

/// Owns the routing client and worker pool; borrows the dataset for its lifetime.
pub struct Resolver<'d> {
    store: &'d PollingUnitStore,
    provider: Box<dyn RoutingProvider>,
    pool: ThreadPool,
}

impl<'d> Resolver<'d> {
    pub fn new(
        store: &'d PollingUnitStore,
        provider: Box<dyn RoutingProvider>,
        workers: usize,
    ) -> Result<Self, ResolveError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("routing-{i}"))
            .build()?;
        Ok(Self { store, provider, pool })
    }

    /// Validates the raw inputs and runs the pipeline.
    pub fn find_nearest(&self, lat: f64, lon: f64, count: usize) -> Result<ResultSet<'d>, ResolveError> {
        let query = NearestQuery::new(lat, lon, count)?;
        self.resolve(&query, &CancelToken::new())
    }

    /// Runs pre-filter, refinement and ranking for an already validated query.
    ///
    /// Returns `Cancelled` if `cancel` was tripped at any point before the
    /// batch finished.
    pub fn resolve(&self, query: &NearestQuery, cancel: &CancelToken) -> Result<ResultSet<'d>, ResolveError> {
        if cancel.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }

        let candidates = prefilter(&query.point, self.store.units(), query.count);
        log::info!(
            "Pre-filter kept {} of {} units for {:?}",
            candidates.len(),
            self.store.len(),
            query.point.location()
        );
        if candidates.is_empty() {
            log::warn!("Dataset is empty; no polling units to rank");
            return Ok(ResultSet::default());
        }

        let refined = refine(self.provider.as_ref(), &self.pool, &query.point, &candidates, cancel);
        if cancel.is_cancelled() {
            log::info!("Query cancelled; discarding {} refined candidates", refined.len());
            return Err(ResolveError::Cancelled);
        }

        let results = rank(refined, query.count);
        log::info!(
            "Ranked {} polling units ({} reachable by road)",
            results.len(),
            results.reachable_count()
        );
        Ok(results)
    }
}

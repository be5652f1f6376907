use super::{build_client, directions_url, request_directions};
use crate::sdk::query::GeoPoint;
use crate::sdk::refine::CancelToken;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::RouteSummary;
use crate::sdk::routing::service::RoutingProvider;
use crate::sdk::util::rate_limit::Limiter;
use reqwest::blocking::Client;
use std::time::Duration;

/// Hosted openrouteservice, authenticated with an API key and rate limited.
pub struct RemoteOrsProvider {
    client: Client,
    api_key: String,
    url: String,
    limiter: Limiter,
}

impl RemoteOrsProvider {
    pub fn new(
        api_key: String,
        base_url: String,
        profile: String,
        timeout: Duration,
        limiter: Limiter,
    ) -> Result<Self, RoutingError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            url: directions_url(&base_url, &profile),
            limiter,
        })
    }

    fn send(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteSummary, RoutingError> {
        log::debug!(
            "[PROVIDER] Calling remote get_directions for {:?} -> {:?}",
            start,
            end
        );
        request_directions(&self.client, &self.url, Some(&self.api_key), start, end)
    }
}

impl RoutingProvider for RemoteOrsProvider {
    fn get_directions(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteSummary, RoutingError> {
        if start == end {
            log::debug!("Start and end coordinates are identical. Returning zero route.");
            return Ok(RouteSummary::stationary(start));
        }

        self.limiter.wait();
        self.send(start, end)
    }

    fn get_directions_cancellable(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        cancel: &CancelToken,
    ) -> Result<RouteSummary, RoutingError> {
        if start == end {
            return Ok(RouteSummary::stationary(start));
        }

        if !self.limiter.wait_unless(|| cancel.is_cancelled()) {
            log::debug!("Dropping queued request to {:?}: query cancelled", end);
            return Err(RoutingError::Cancelled);
        }
        self.send(start, end)
    }
}

use super::{build_client, directions_url, request_directions};
use crate::sdk::query::GeoPoint;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::RouteSummary;
use crate::sdk::routing::service::RoutingProvider;
use reqwest::blocking::Client;
use std::time::Duration;

/// Self-hosted openrouteservice: no key, no rate limit.
pub struct LocalOrsProvider {
    client: Client,
    url: String,
}

impl LocalOrsProvider {
    pub fn new(base_url: String, profile: String, timeout: Duration) -> Result<Self, RoutingError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: directions_url(&base_url, &profile),
        })
    }
}

impl RoutingProvider for LocalOrsProvider {
    fn get_directions(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteSummary, RoutingError> {
        if start == end {
            return Ok(RouteSummary::stationary(start));
        }

        log::debug!(
            "[PROVIDER] Calling local get_directions for {:?} -> {:?}",
            start,
            end
        );
        request_directions(&self.client, &self.url, None, start, end)
    }
}

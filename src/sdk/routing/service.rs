use super::error::RoutingError;
use super::route::RouteSummary;
use crate::sdk::query::GeoPoint;
use crate::sdk::refine::CancelToken;

pub trait RoutingProvider: Send + Sync {
    /// Driving route from `start` to `end`, with distance, duration and geometry.
    fn get_directions(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteSummary, RoutingError>;

    /// Same as `get_directions`, but gives up with `RoutingError::Cancelled`
    /// if `cancel` trips before the request reaches the network.
    ///
    /// Providers that block before sending (rate limiting) should override this.
    fn get_directions_cancellable(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        cancel: &CancelToken,
    ) -> Result<RouteSummary, RoutingError> {
        if cancel.is_cancelled() {
            return Err(RoutingError::Cancelled);
        }
        self.get_directions(start, end)
    }
}

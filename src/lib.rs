pub mod sdk;

pub use sdk::config::Settings;
pub use sdk::dataset::{DatasetError, PollingUnit, PollingUnitStore};
pub use sdk::query::{GeoPoint, NearestQuery, QueryError, QueryPoint};
pub use sdk::rank::ResultSet;
pub use sdk::refine::{CancelToken, Candidate};
pub use sdk::resolve::{ResolveError, Resolver};
pub use sdk::routing::{RouteSummary, RoutingError, RoutingProvider};

pub mod error;
pub mod provider;
pub mod route;
pub mod service;

pub use error::RoutingError;
pub use provider::{LocalOrsProvider, RemoteOrsProvider};
pub use route::RouteSummary;
pub use service::RoutingProvider;

pub mod config;
pub mod dataset;
pub mod export;
pub mod prefilter;
pub mod query;
pub mod rank;
pub mod refine;
pub mod resolve;
pub mod routing;
pub mod util;

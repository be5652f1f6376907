use std::{env, str::FromStr, time::Duration};
use thiserror::Error;

use super::util::rate_limit::ORS_REQUESTS_PER_MINUTE;

pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";
pub const DEFAULT_PROFILE: &str = "driving-car";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WORKERS: usize = 8;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("ORS_API_KEY is not set (set ORS_LOCAL_URL to use a self-hosted instance instead)")]
    MissingApiKey,

    #[error("{var} has an invalid value: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Which openrouteservice deployment to talk to.
#[derive(Debug, Clone, PartialEq)]
pub enum OrsConfig {
    Remote { api_key: String, base_url: String },
    Local { base_url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ors: OrsConfig,
    pub profile: String,
    pub timeout: Duration,
    pub requests_per_minute: u32,
    pub workers: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Reads settings through `lookup`, so tests can supply a map instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let ors = match non_empty("ORS_LOCAL_URL") {
            Some(base_url) => OrsConfig::Local {
                base_url: trim_base(base_url),
            },
            None => OrsConfig::Remote {
                api_key: non_empty("ORS_API_KEY").ok_or(ConfigError::MissingApiKey)?,
                base_url: trim_base(
                    non_empty("ORS_BASE_URL").unwrap_or_else(|| DEFAULT_ORS_BASE_URL.to_string()),
                ),
            },
        };

        let timeout_secs: u64 = parse_or("ORS_TIMEOUT_SECS", non_empty("ORS_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
        let workers: usize = parse_or("ROUTING_WORKERS", non_empty("ROUTING_WORKERS"), DEFAULT_WORKERS)?;
        if workers == 0 {
            return Err(ConfigError::InvalidValue {
                var: "ROUTING_WORKERS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            ors,
            profile: non_empty("ORS_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            requests_per_minute: parse_or(
                "ORS_REQUESTS_PER_MINUTE",
                non_empty("ORS_REQUESTS_PER_MINUTE"),
                ORS_REQUESTS_PER_MINUTE,
            )?,
            workers,
        })
    }
}

fn parse_or<T: FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// openrouteservice code for "Could not find routable point within a radius".
pub const ORS_UNROUTABLE_POINT: u32 = 2010;

// Helper structs to parse the JSON error response from ORS
#[derive(Deserialize, Debug)]
pub struct OrsErrorDetail {
    pub code: u32,
    #[serde(default)]
    pub message: String,
}
#[derive(Deserialize, Debug)]
pub struct OrsErrorPayload {
    pub error: OrsErrorDetail,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("A point was not routable on the road network")]
    UnroutablePoint,

    #[error("API Error (Code {code}): {message}")]
    ApiError { code: u32, message: String },

    #[error("Unstructured API Error ({status}): {body}")]
    RawApiError { status: StatusCode, body: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Underlying request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("No route found in success response")]
    NoRoute,

    #[error("Route summary is not usable: distance={distance}, duration={duration}")]
    InvalidSummary { distance: f64, duration: f64 },

    #[error("Request skipped because the query was cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RoutingError::Timeout
        } else {
            RoutingError::RequestError(err)
        }
    }
}

impl RoutingError {
    /// Maps a non-success response body to the most specific error available.
    pub fn from_response(status: StatusCode, body: String) -> Self {
        match serde_json::from_str::<OrsErrorPayload>(&body) {
            Ok(payload) if payload.error.code == ORS_UNROUTABLE_POINT => RoutingError::UnroutablePoint,
            Ok(payload) => RoutingError::ApiError {
                code: payload.error.code,
                message: payload.error.message,
            },
            Err(_) => RoutingError::RawApiError { status, body },
        }
    }
}

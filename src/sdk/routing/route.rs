use geojson::{Feature, Geometry, JsonObject, Value};
use serde::Serialize;

use super::error::RoutingError;
use super::provider::types::{DirectionsResponse, RouteProperties};
use crate::sdk::query::GeoPoint;

/// Driving metrics for one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub distance_m: f64,
    pub duration_s: f64,
    /// First route feature of the provider response, unmodified.
    pub route: Feature,
}

impl RouteSummary {
    /// Zero-length route used when origin and destination coincide.
    pub fn stationary(point: GeoPoint) -> Self {
        let mut properties = JsonObject::new();
        properties.insert("distance".to_string(), 0.0.into());
        properties.insert("duration".to_string(), 0.0.into());
        Self {
            distance_m: 0.0,
            duration_s: 0.0,
            route: Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(vec![
                    point.lon_lat().to_vec(),
                    point.lon_lat().to_vec(),
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            },
        }
    }
}

/// Extracts distance and duration from `features[0].properties.segments[0]`
/// of a successful directions body.
pub fn parse_directions(text: &str) -> Result<RouteSummary, RoutingError> {
    let response: DirectionsResponse = serde_json::from_str(text)?;
    let feature = response.features.into_iter().next().ok_or(RoutingError::NoRoute)?;
    if feature.geometry.is_none() {
        return Err(RoutingError::NoRoute);
    }

    let properties = feature
        .properties
        .clone()
        .map(serde_json::Value::Object)
        .ok_or(RoutingError::NoRoute)?;
    let properties: RouteProperties = serde_json::from_value(properties)?;
    let segment = properties.segments.first().copied().ok_or(RoutingError::NoRoute)?;

    let usable = |v: f64| v.is_finite() && v >= 0.0;
    if !usable(segment.distance) || !usable(segment.duration) {
        return Err(RoutingError::InvalidSummary {
            distance: segment.distance,
            duration: segment.duration,
        });
    }

    Ok(RouteSummary {
        distance_m: segment.distance,
        duration_s: segment.duration,
        route: feature,
    })
}

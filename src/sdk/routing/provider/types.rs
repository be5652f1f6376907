use geojson::Feature;
use serde::Deserialize;

// --- openrouteservice `/v2/directions/{profile}/geojson` response ---

#[derive(Deserialize)]
pub struct DirectionsResponse {
    pub features: Vec<Feature>,
}

#[derive(Deserialize)]
pub struct RouteProperties {
    pub segments: Vec<Segment>,
}

#[derive(Deserialize, Clone, Copy)]
pub struct Segment {
    pub distance: f64,
    pub duration: f64,
}

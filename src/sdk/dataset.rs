use geojson::{Feature, GeoJson, Value};
use serde::Serialize;
use std::{fs, io, path::Path};
use thiserror::Error;

use super::query::GeoPoint;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] io::Error),

    #[error("Dataset is not valid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("Dataset must be a FeatureCollection")]
    NotAFeatureCollection,

    #[error("Feature {index} has no geometry")]
    MissingGeometry { index: usize },

    #[error("Feature {index} is not a Point")]
    NotAPoint { index: usize },

    #[error("Feature {index} has invalid coordinates {coordinates:?}")]
    InvalidCoordinates { index: usize, coordinates: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollingUnit {
    /// Row index of the feature in the dataset file.
    pub id: usize,
    pub name: String,
    pub ward: String,
    pub lga: String,
    pub state: String,
    pub location: GeoPoint,
}

/// Read-only collection of polling units, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct PollingUnitStore {
    units: Vec<PollingUnit>,
}

impl PollingUnitStore {
    /// Loads a GeoJSON FeatureCollection of Point features.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let store = Self::from_geojson_str(&text)?;
        log::info!(
            "Loaded {} polling units from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn from_geojson_str(text: &str) -> Result<Self, DatasetError> {
        let collection = match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection,
            _ => return Err(DatasetError::NotAFeatureCollection),
        };

        let units = collection
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| unit_from_feature(index, feature))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { units })
    }

    /// Builds a store from already-constructed units; ids are reassigned to row order.
    pub fn from_units(units: Vec<PollingUnit>) -> Self {
        let units = units
            .into_iter()
            .enumerate()
            .map(|(id, unit)| PollingUnit { id, ..unit })
            .collect();
        Self { units }
    }

    pub fn units(&self) -> &[PollingUnit] {
        &self.units
    }

    pub fn get(&self, id: usize) -> Option<&PollingUnit> {
        self.units.get(id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

fn unit_from_feature(index: usize, feature: &Feature) -> Result<PollingUnit, DatasetError> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or(DatasetError::MissingGeometry { index })?;

    let position = match &geometry.value {
        Value::Point(position) => position,
        _ => return Err(DatasetError::NotAPoint { index }),
    };

    let location = match position.as_slice() {
        [lon, lat, ..] => GeoPoint::new(*lat, *lon),
        _ => GeoPoint::new(f64::NAN, f64::NAN),
    };
    if !location.is_valid() {
        return Err(DatasetError::InvalidCoordinates {
            index,
            coordinates: position.clone(),
        });
    }

    Ok(PollingUnit {
        id: index,
        name: text_property(feature, "name"),
        ward: text_property(feature, "ward"),
        lga: text_property(feature, "lga"),
        state: text_property(feature, "state"),
        location,
    })
}

// Missing and null attributes read as empty; numbers and booleans are stringified.
fn text_property(feature: &Feature, key: &str) -> String {
    match feature.property(key) {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use std::{fs::File, io, io::Write, path::Path};
use thiserror::Error;

use super::query::{GeoPoint, QueryPoint};
use super::rank::ResultSet;
use super::refine::Candidate;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One row of the downloadable table.
#[derive(Debug, Serialize)]
struct TableRow<'a> {
    #[serde(rename = "Polling Unit")]
    name: &'a str,
    #[serde(rename = "Ward")]
    ward: &'a str,
    #[serde(rename = "LGA")]
    lga: &'a str,
    #[serde(rename = "State")]
    state: &'a str,
    #[serde(rename = "Road Distance (m)")]
    road_distance_m: f64,
    #[serde(rename = "Duration (s)")]
    duration_s: f64,
}

impl<'a> From<&'a Candidate<'_>> for TableRow<'a> {
    fn from(c: &'a Candidate<'_>) -> Self {
        Self {
            name: &c.unit.name,
            ward: &c.unit.ward,
            lga: &c.unit.lga,
            state: &c.unit.state,
            road_distance_m: c.road_distance_m,
            duration_s: c.road_duration_s,
        }
    }
}

/// Writes the ranked table with a header row; unreachable entries print `inf`.
pub fn write_csv<W: Write>(results: &ResultSet<'_>, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if results.is_empty() {
        wtr.write_record([
            "Polling Unit",
            "Ward",
            "LGA",
            "State",
            "Road Distance (m)",
            "Duration (s)",
        ])?;
    }
    for candidate in results {
        wtr.serialize(TableRow::from(candidate))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file<P: AsRef<Path>>(results: &ResultSet<'_>, path: P) -> Result<(), ExportError> {
    write_csv(results, File::create(path)?)
}

#[derive(Serialize)]
struct RankedEntry<'r, 'a> {
    rank: usize,
    #[serde(flatten)]
    candidate: &'r Candidate<'a>,
}

/// Pretty JSON array of ranked entries; non-finite metrics become `null`.
pub fn write_json<W: Write>(results: &ResultSet<'_>, writer: W) -> Result<(), ExportError> {
    let ranked: Vec<_> = results
        .iter()
        .enumerate()
        .map(|(idx, candidate)| RankedEntry { rank: idx + 1, candidate })
        .collect();
    serde_json::to_writer_pretty(writer, &ranked)?;
    Ok(())
}

pub fn write_json_file<P: AsRef<Path>>(results: &ResultSet<'_>, path: P) -> Result<(), ExportError> {
    write_json(results, File::create(path)?)
}

/// Map overlay for one entry: the user's position, the polling unit, and the
/// route between them when one was found.
pub fn route_overlay(query: &QueryPoint, candidate: &Candidate<'_>) -> FeatureCollection {
    let mut features = vec![
        marker(query.location(), "Your Location".to_string(), "blue"),
        marker(
            candidate.unit.location,
            format!("{} ({} Ward)", candidate.unit.name, candidate.unit.ward),
            "red",
        ),
    ];

    if let Some(route) = &candidate.route {
        let mut route = route.clone();
        let properties = route.properties.get_or_insert_with(JsonObject::new);
        properties.insert("name".to_string(), "Route".into());
        properties.insert("stroke".to_string(), "green".into());
        properties.insert("stroke-width".to_string(), 4_u32.into());
        features.push(route);
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn write_route_overlay<P: AsRef<Path>>(
    query: &QueryPoint,
    candidate: &Candidate<'_>,
    path: P,
) -> Result<(), ExportError> {
    let overlay = route_overlay(query, candidate);
    serde_json::to_writer_pretty(File::create(path)?, &overlay)?;
    Ok(())
}

fn marker(point: GeoPoint, popup: String, color: &str) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("popup".to_string(), popup.into());
    properties.insert("marker-color".to_string(), color.into());
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(point.lon_lat().to_vec()))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::dataset::PollingUnit;
    use crate::sdk::prefilter::GeodesicMatch;
    use crate::sdk::rank::rank;
    use crate::sdk::routing::RouteSummary;

    fn unit(id: usize, name: &str, ward: &str) -> PollingUnit {
        PollingUnit {
            id,
            name: name.to_string(),
            ward: ward.to_string(),
            lga: "Bwari".to_string(),
            state: "FCT".to_string(),
            location: GeoPoint::new(9.28, 7.38),
        }
    }

    fn routed(unit: &PollingUnit, distance: f64, duration: f64) -> Candidate<'_> {
        let mut summary = RouteSummary::stationary(unit.location);
        summary.distance_m = distance;
        summary.duration_s = duration;
        Candidate::routed(GeodesicMatch { unit, geodesic_distance_m: 100.0 }, summary)
    }

    #[test]
    fn csv_has_fixed_columns_and_rows() {
        let a = unit(0, "Kubwa Central", "Kubwa");
        let b = unit(1, "Dutse Alhaji, Block 2", "Dutse");
        let refined = vec![
            Candidate::unreachable(GeodesicMatch { unit: &b, geodesic_distance_m: 50.0 }),
            routed(&a, 1250.5, 180.0),
        ];
        let results = rank(refined, 5);

        let mut out = Vec::new();
        write_csv(&results, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Polling Unit,Ward,LGA,State,Road Distance (m),Duration (s)");
        assert_eq!(lines[1], "Kubwa Central,Kubwa,Bwari,FCT,1250.5,180.0");
        assert_eq!(lines[2], "\"Dutse Alhaji, Block 2\",Dutse,Bwari,FCT,inf,inf");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn csv_of_empty_result_is_header_only() {
        let mut out = Vec::new();
        write_csv(&ResultSet::default(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Polling Unit,Ward,LGA,State,Road Distance (m),Duration (s)\n"
        );
    }

    #[test]
    fn json_ranks_and_nulls_unreachable_metrics() {
        let a = unit(0, "A", "W");
        let b = unit(1, "B", "W");
        let refined = vec![
            Candidate::unreachable(GeodesicMatch { unit: &b, geodesic_distance_m: 5.0 }),
            routed(&a, 10.0, 2.0),
        ];
        let results = rank(refined, 2);

        let mut out = Vec::new();
        write_json(&results, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value[0]["rank"], 1);
        assert_eq!(value[0]["unit"]["name"], "A");
        assert_eq!(value[0]["road_distance_m"], 10.0);
        assert_eq!(value[1]["rank"], 2);
        assert!(value[1]["road_distance_m"].is_null());
        assert!(value[1]["route"].is_null());
    }

    #[test]
    fn overlay_has_markers_and_route() {
        let a = unit(0, "Kubwa Central", "Kubwa");
        let candidate = routed(&a, 10.0, 2.0);
        let query = QueryPoint::new(9.1, 7.4).unwrap();

        let overlay = route_overlay(&query, &candidate);
        assert_eq!(overlay.features.len(), 3);
        assert_eq!(
            overlay.features[0].property("popup").and_then(|v| v.as_str()),
            Some("Your Location")
        );
        assert_eq!(
            overlay.features[1].property("popup").and_then(|v| v.as_str()),
            Some("Kubwa Central (Kubwa Ward)")
        );
        assert_eq!(
            overlay.features[2].property("stroke").and_then(|v| v.as_str()),
            Some("green")
        );
    }

    #[test]
    fn overlay_without_route_has_markers_only() {
        let a = unit(0, "A", "W");
        let candidate = Candidate::unreachable(GeodesicMatch { unit: &a, geodesic_distance_m: 1.0 });
        let overlay = route_overlay(&QueryPoint::new(9.0, 7.0).unwrap(), &candidate);
        assert_eq!(overlay.features.len(), 2);
    }
}

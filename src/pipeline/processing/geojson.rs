use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::pipeline::processing::schema::CheckpointRecord;

/// GeoJSON point geometry. Coordinates are ordered `[longitude, latitude]`;
/// the ordering is an external contract with the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub geometry: PointGeometry,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<Feature>,
}

/// Outcome of projecting a record sequence: the feature collection in input
/// order plus the count of records dropped for malformed coordinates.
#[derive(Debug)]
pub struct ProjectionOutcome {
    pub collection: FeatureCollection,
    pub skipped: usize,
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Projects one canonical record to a point feature.
///
/// Returns `None` when either coordinate is empty, non-numeric or not
/// finite; the record is excluded from the geospatial output only, the
/// tabular output is unaffected. The property bag is the canonical record
/// minus the two coordinate fields; empty-string values are retained
/// verbatim.
pub fn project(record: &CheckpointRecord) -> Option<Feature> {
    let latitude = parse_coordinate(&record.latitude)?;
    let longitude = parse_coordinate(&record.longitude)?;

    let mut properties = Map::new();
    for (column, value) in record.as_row() {
        if column == "latitude" || column == "longitude" {
            continue;
        }
        properties.insert(column.to_string(), Value::String(value.to_string()));
    }

    Some(Feature {
        feature_type: "Feature".to_string(),
        geometry: PointGeometry {
            geometry_type: "Point".to_string(),
            coordinates: [longitude, latitude],
        },
        properties,
    })
}

/// Projects a record sequence into a feature collection, preserving input
/// order. Coordinate failures are counted, never an error.
pub fn project_records(records: &[CheckpointRecord]) -> ProjectionOutcome {
    let mut features = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        match project(record) {
            Some(feature) => features.push(feature),
            None => {
                debug!(id = %record.id, "record has no valid coordinate pair, excluded from geojson");
                skipped += 1;
            }
        }
    }

    ProjectionOutcome {
        collection: FeatureCollection {
            collection_type: "FeatureCollection".to_string(),
            features,
        },
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_coords(latitude: &str, longitude: &str) -> CheckpointRecord {
        CheckpointRecord {
            id: "RUS-PSK-001".to_string(),
            name_ru: "Куничина Гора".to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            ..CheckpointRecord::default()
        }
    }

    #[test]
    fn coordinates_are_longitude_first() {
        let feature = project(&record_with_coords("55.75", "37.61")).unwrap();
        assert_eq!(feature.geometry.coordinates, [37.61, 55.75]);
        assert_eq!(feature.geometry.geometry_type, "Point");
    }

    #[test]
    fn properties_exclude_coordinate_fields_and_keep_empty_strings() {
        let feature = project(&record_with_coords("55.75", "37.61")).unwrap();
        assert!(!feature.properties.contains_key("latitude"));
        assert!(!feature.properties.contains_key("longitude"));
        assert_eq!(feature.properties["name_ru"], "Куничина Гора");
        // Unset fields are retained verbatim as empty strings
        assert_eq!(feature.properties["municipality"], "");
        assert_eq!(feature.properties.len(), 23);
    }

    #[test]
    fn malformed_coordinates_are_filtered_not_errors() {
        assert!(project(&record_with_coords("", "37.61")).is_none());
        assert!(project(&record_with_coords("55.75", "")).is_none());
        assert!(project(&record_with_coords("north", "37.61")).is_none());
        assert!(project(&record_with_coords("NaN", "37.61")).is_none());
        assert!(project(&record_with_coords("inf", "37.61")).is_none());
    }

    #[test]
    fn whitespace_padded_coordinates_still_parse() {
        let feature = project(&record_with_coords(" 55.75 ", "37.61")).unwrap();
        assert_eq!(feature.geometry.coordinates, [37.61, 55.75]);
    }

    #[test]
    fn projection_preserves_order_and_counts_skips() {
        let records = vec![
            record_with_coords("55.75", "37.61"),
            record_with_coords("", ""),
            record_with_coords("43.74", "44.64"),
        ];
        let outcome = project_records(&records);

        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.collection.collection_type, "FeatureCollection");
        assert_eq!(outcome.collection.features.len(), 2);
        assert_eq!(outcome.collection.features[0].geometry.coordinates, [37.61, 55.75]);
        assert_eq!(outcome.collection.features[1].geometry.coordinates, [44.64, 43.74]);
    }
}

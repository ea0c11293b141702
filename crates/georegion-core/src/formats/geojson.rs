//! GeoJSON format reader implementation

use std::path::Path;

use crate::error::{GeoregionError, Result};
use crate::formats::{read_text, FormatReader};
use crate::models::{Crs, Properties, PropertyValue, RawRecord, SourceBatch};

/// GeoJSON format reader
pub struct GeoJsonReader;

impl FormatReader for GeoJsonReader {
    fn read(&self, path: &Path) -> Result<SourceBatch> {
        tracing::info!("<-- Reading {} ...", path.display());

        let content = read_text(path, self.format_name())?;

        let geojson: geojson::GeoJson =
            content.parse().map_err(|e| GeoregionError::SourceFormatError {
                format: self.format_name().to_string(),
                path: path.to_path_buf(),
                message: format!("Failed to parse GeoJSON: {}", e),
            })?;

        let (records, crs) = extract_records_and_crs(geojson);

        Ok(SourceBatch {
            path: path.to_path_buf(),
            format_name: self.format_name().to_string(),
            crs,
            records,
        })
    }

    fn patterns(&self) -> &[&str] {
        &["*.geojson"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}

fn extract_records_and_crs(geojson: geojson::GeoJson) -> (Vec<RawRecord>, Option<Crs>) {
    match geojson {
        geojson::GeoJson::FeatureCollection(fc) => {
            let crs = fc
                .foreign_members
                .as_ref()
                .and_then(|fm| fm.get("crs"))
                .and_then(extract_epsg_from_crs)
                .map(Crs::epsg);

            let records = fc.features.into_iter().map(convert_feature).collect();
            (records, crs)
        }
        geojson::GeoJson::Feature(feature) => (vec![convert_feature(feature)], None),
        geojson::GeoJson::Geometry(geometry) => {
            (vec![RawRecord::new(geometry.value, Properties::new())], None)
        }
    }
}

/// Convert a GeoJSON feature to a raw record
fn convert_feature(feature: geojson::Feature) -> RawRecord {
    let properties = feature
        .properties
        .map(|props| {
            props.iter().map(|(k, v)| (k.clone(), PropertyValue::from_json(v))).collect()
        })
        .unwrap_or_default();

    RawRecord { geometry: feature.geometry.map(|g| g.value), properties }
}

/// Extract EPSG code from a legacy `crs` member
fn extract_epsg_from_crs(crs: &serde_json::Value) -> Option<u32> {
    // Parse "EPSG:4326" or "urn:ogc:def:crs:EPSG::4326"
    let name = crs.get("properties")?.get("name")?.as_str()?;
    if name.ends_with("CRS84") {
        return Some(4326);
    }
    name.rsplit(':').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_geojson_reader_feature_collection() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("North-Coast.geojson");

        let geojson_content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [17.5, 40.5]
                    },
                    "properties": {
                        "ID": "abc",
                        "Region_Name": "North",
                        "Depth": 12
                    }
                }
            ]
        }"#;

        fs::write(&file_path, geojson_content).unwrap();

        let batch = GeoJsonReader.read(&file_path).unwrap();

        assert_eq!(batch.format_name, "GeoJSON");
        assert!(batch.crs.is_none());
        assert_eq!(batch.records.len(), 1);
        let record = &batch.records[0];
        assert_eq!(record.properties["ID"], PropertyValue::from("abc"));
        assert_eq!(record.properties["Depth"], PropertyValue::Integer(12));
        assert_eq!(record.geometry, Some(geojson::Value::Point(vec![17.5, 40.5])));
    }

    #[test]
    fn test_geojson_crs_member() {
        let crs = serde_json::json!({
            "type": "name",
            "properties": {"name": "urn:ogc:def:crs:EPSG::3857"}
        });
        assert_eq!(extract_epsg_from_crs(&crs), Some(3857));

        let crs84 = serde_json::json!({
            "type": "name",
            "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}
        });
        assert_eq!(extract_epsg_from_crs(&crs84), Some(4326));
    }

    #[test]
    fn test_null_geometry_is_kept_as_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("empty.geojson");
        fs::write(
            &file_path,
            r#"{"type":"Feature","geometry":null,"properties":{"ID":"x"}}"#,
        )
        .unwrap();

        let batch = GeoJsonReader.read(&file_path).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert!(batch.records[0].geometry.is_none());
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("invalid.geojson");
        fs::write(&file_path, "not valid json").unwrap();

        let err = GeoJsonReader.read(&file_path).unwrap_err();
        assert!(matches!(err, GeoregionError::SourceFormatError { .. }));
    }
}

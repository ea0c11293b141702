//! Well-known-text reader: one geometry per file, no attributes, no CRS

use std::path::Path;
use std::str::FromStr;
use wkt::types::{Coord, LineString, Polygon};
use wkt::Wkt;

use crate::error::{GeoregionError, Result};
use crate::formats::{read_text, FormatReader};
use crate::models::{Properties, RawRecord, SourceBatch};

pub struct WktReader;

impl FormatReader for WktReader {
    fn read(&self, path: &Path) -> Result<SourceBatch> {
        tracing::info!("<-- Reading {} ...", path.display());

        let content = read_text(path, self.format_name())?;
        let geometry = parse_wkt(&content).map_err(|message| GeoregionError::SourceFormatError {
            format: self.format_name().to_string(),
            path: path.to_path_buf(),
            message,
        })?;

        Ok(SourceBatch {
            path: path.to_path_buf(),
            format_name: self.format_name().to_string(),
            crs: None,
            records: vec![RawRecord::new(geometry, Properties::new())],
        })
    }

    fn patterns(&self) -> &[&str] {
        &["*.wkt", "*_wkt.txt"]
    }

    fn format_name(&self) -> &str {
        "WKT"
    }
}

/// Parse one WKT geometry into a GeoJSON value, keeping any Z ordinate
pub fn parse_wkt(content: &str) -> std::result::Result<geojson::Value, String> {
    let parsed = Wkt::<f64>::from_str(content.trim()).map_err(|e| e.to_string())?;
    convert(&parsed)
}

fn coord(c: &Coord<f64>) -> Vec<f64> {
    match c.z {
        Some(z) => vec![c.x, c.y, z],
        None => vec![c.x, c.y],
    }
}

fn line(ls: &LineString<f64>) -> Vec<Vec<f64>> {
    ls.0.iter().map(coord).collect()
}

fn rings(polygon: &Polygon<f64>) -> Vec<Vec<Vec<f64>>> {
    polygon.0.iter().map(line).collect()
}

fn convert(parsed: &Wkt<f64>) -> std::result::Result<geojson::Value, String> {
    let value = match parsed {
        Wkt::Point(p) => match &p.0 {
            Some(c) => geojson::Value::Point(coord(c)),
            None => return Err("POINT EMPTY has no coordinates".to_string()),
        },
        Wkt::LineString(ls) => geojson::Value::LineString(line(ls)),
        Wkt::Polygon(poly) => geojson::Value::Polygon(rings(poly)),
        Wkt::MultiPoint(mp) => {
            geojson::Value::MultiPoint(mp.0.iter().filter_map(|p| p.0.as_ref()).map(coord).collect())
        }
        Wkt::MultiLineString(mls) => geojson::Value::MultiLineString(mls.0.iter().map(line).collect()),
        Wkt::MultiPolygon(mp) => geojson::Value::MultiPolygon(mp.0.iter().map(rings).collect()),
        Wkt::GeometryCollection(_) => {
            return Err("GEOMETRYCOLLECTION is not a supported geometry type".to_string());
        }
    };
    Ok(value)
}

//! Shapefile format reader implementation
//!
//! This module provides support for reading ESRI Shapefiles using pure Rust.
//! Shapefiles consist of multiple component files (.shp, .shx, .dbf, .prj)
//! that must all be present for proper reading. Z ordinates are kept in the
//! raw records; removing them is the normalizer's job.

use shapefile::dbase::FieldValue as DbaseFieldValue;
use shapefile::{PolygonRing, Reader as ShapefileReader, Shape};
use std::path::{Path, PathBuf};

use crate::error::{GeoregionError, Result};
use crate::formats::{read_text, FormatReader};
use crate::models::{Crs, PropertyValue, RawRecord, SourceBatch};

/// Shapefile format reader
pub struct ShapefileFormatReader;

impl FormatReader for ShapefileFormatReader {
    fn read(&self, path: &Path) -> Result<SourceBatch> {
        tracing::info!("<-- Reading {} ...", path.display());

        // Verify all required component files exist
        self.verify_components(path)?;

        let mut reader = ShapefileReader::from_path(path).map_err(|e| format_error(path, e))?;

        let crs = self.extract_crs(path)?;

        let mut records = Vec::new();
        for result in reader.iter_shapes_and_records() {
            let (shape, record) = result.map_err(|e| format_error(path, e))?;

            let geometry = convert_shape(&shape).map_err(|message| {
                GeoregionError::SourceFormatError {
                    format: "Shapefile".to_string(),
                    path: path.to_path_buf(),
                    message: format!("record {}: {}", records.len(), message),
                }
            })?;

            let properties = record
                .into_iter()
                .map(|(name, value)| (name, convert_dbase_value(&value)))
                .collect();

            records.push(RawRecord { geometry, properties });
        }

        Ok(SourceBatch {
            path: path.to_path_buf(),
            format_name: self.format_name().to_string(),
            crs,
            records,
        })
    }

    fn patterns(&self) -> &[&str] {
        &["*.shp"]
    }

    fn format_name(&self) -> &str {
        "Shapefile"
    }
}

impl ShapefileFormatReader {
    /// Path of a component file next to the .shp
    ///
    /// Only the final extension is replaced, so `roads.2020.shp` pairs with `roads.2020.dbf`.
    fn sidecar(&self, path: &Path, extension: &str) -> Result<PathBuf> {
        let is_shp = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("shp"))
            .unwrap_or(false);

        if !is_shp {
            return Err(GeoregionError::InvalidPath {
                path: path.to_path_buf(),
                reason: "Not a Shapefile (.shp)".to_string(),
            });
        }

        Ok(path.with_extension(extension))
    }

    /// Verify that all required Shapefile component files exist
    fn verify_components(&self, path: &Path) -> Result<()> {
        let mut missing = Vec::new();
        for ext in ["shp", "shx", "dbf"] {
            if !self.sidecar(path, ext)?.exists() {
                missing.push(format!(".{}", ext));
            }
        }

        if !missing.is_empty() {
            return Err(GeoregionError::SourceFormatError {
                format: "Shapefile".to_string(),
                path: path.to_path_buf(),
                message: format!("Missing required component files: {}", missing.join(", ")),
            });
        }

        Ok(())
    }

    /// CRS declared by the .prj sidecar; None when absent or unrecognised
    fn extract_crs(&self, path: &Path) -> Result<Option<Crs>> {
        let prj_path = self.sidecar(path, "prj")?;

        if !prj_path.exists() {
            return Ok(None);
        }

        let prj_content = read_text(&prj_path, self.format_name())?;

        match crs_from_prj(&prj_content) {
            Some(crs) => Ok(Some(crs)),
            None => {
                tracing::warn!(
                    "Unrecognised projection in {}, assuming {}",
                    prj_path.display(),
                    Crs::canonical()
                );
                Ok(None)
            }
        }
    }
}

fn format_error(path: &Path, e: impl std::fmt::Display) -> GeoregionError {
    GeoregionError::SourceFormatError {
        format: "Shapefile".to_string(),
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Resolve a .prj WKT definition to an EPSG CRS
pub fn crs_from_prj(wkt: &str) -> Option<Crs> {
    parse_epsg_from_wkt(wkt)
        .or_else(|| epsg_from_esri_name(wkt))
        .map(Crs::epsg)
}

/// Parse EPSG code from WKT string
///
/// In WKT1 the authority of the outermost CRS is the last AUTHORITY node;
/// earlier ones belong to the datum, spheroid or units.
fn parse_epsg_from_wkt(wkt: &str) -> Option<u32> {
    const AUTHORITY: &str = "AUTHORITY[\"EPSG\",\"";

    if let Some(start) = wkt.rfind(AUTHORITY) {
        let code_start = start + AUTHORITY.len();
        if let Some(end) = wkt[code_start..].find('"') {
            if let Ok(code) = wkt[code_start..code_start + end].parse::<u32>() {
                return Some(code);
            }
        }
    }

    // Look for EPSG: prefix
    if let Some(start) = wkt.find("EPSG:") {
        let code_str: String =
            wkt[start + 5..].chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(code) = code_str.parse::<u32>() {
            return Some(code);
        }
    }

    None
}

/// ESRI-flavoured .prj files name the CRS but carry no authority
fn epsg_from_esri_name(wkt: &str) -> Option<u32> {
    let name = wkt.split('"').nth(1)?;

    match name {
        "GCS_WGS_1984" | "WGS 84" => return Some(4326),
        "WGS_1984_Web_Mercator_Auxiliary_Sphere" | "WGS_84_Pseudo_Mercator" => return Some(3857),
        "GCS_ETRS_1989" => return Some(4258),
        _ => {}
    }

    let (base, zone) = name.rsplit_once("_UTM_Zone_")?;
    let (zone, north) = match zone.strip_suffix('N') {
        Some(z) => (z, true),
        None => (zone.strip_suffix('S')?, false),
    };
    let zone: u32 = zone.parse().ok().filter(|z| (1..=60).contains(z))?;

    match (base, north) {
        ("WGS_1984", true) => Some(32600 + zone),
        ("WGS_1984", false) => Some(32700 + zone),
        ("ETRS_1989", true) => Some(25800 + zone),
        _ => None,
    }
}

fn position(x: f64, y: f64) -> Vec<f64> {
    vec![x, y]
}

fn position_z(x: f64, y: f64, z: f64) -> Vec<f64> {
    vec![x, y, z]
}

/// Split polygon rings into polygons: every outer ring opens a new polygon
fn group_rings<P>(rings: &[PolygonRing<P>], to_position: impl Fn(&P) -> Vec<f64>) -> geojson::Value {
    let mut polygons: Vec<Vec<Vec<Vec<f64>>>> = Vec::new();
    for ring in rings {
        let coords: Vec<Vec<f64>> = ring.points().iter().map(&to_position).collect();
        match ring {
            PolygonRing::Outer(_) => polygons.push(vec![coords]),
            PolygonRing::Inner(_) => match polygons.last_mut() {
                Some(polygon) => polygon.push(coords),
                None => polygons.push(vec![coords]),
            },
        }
    }

    if polygons.len() == 1 {
        geojson::Value::Polygon(polygons.remove(0))
    } else {
        geojson::Value::MultiPolygon(polygons)
    }
}

fn lines(parts: Vec<Vec<Vec<f64>>>) -> geojson::Value {
    let mut parts = parts;
    if parts.len() == 1 {
        geojson::Value::LineString(parts.remove(0))
    } else {
        geojson::Value::MultiLineString(parts)
    }
}

/// Convert shapefile Shape to a GeoJSON value; None for null shapes
fn convert_shape(shape: &Shape) -> std::result::Result<Option<geojson::Value>, String> {
    let value = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => geojson::Value::Point(position(p.x, p.y)),
        Shape::PointM(p) => geojson::Value::Point(position(p.x, p.y)),
        Shape::PointZ(p) => geojson::Value::Point(position_z(p.x, p.y, p.z)),
        Shape::Polyline(polyline) => lines(
            polyline
                .parts()
                .iter()
                .map(|part| part.iter().map(|p| position(p.x, p.y)).collect())
                .collect(),
        ),
        Shape::PolylineM(polyline) => lines(
            polyline
                .parts()
                .iter()
                .map(|part| part.iter().map(|p| position(p.x, p.y)).collect())
                .collect(),
        ),
        Shape::PolylineZ(polyline) => lines(
            polyline
                .parts()
                .iter()
                .map(|part| part.iter().map(|p| position_z(p.x, p.y, p.z)).collect())
                .collect(),
        ),
        Shape::Polygon(polygon) => group_rings(polygon.rings(), |p| position(p.x, p.y)),
        Shape::PolygonM(polygon) => group_rings(polygon.rings(), |p| position(p.x, p.y)),
        Shape::PolygonZ(polygon) => group_rings(polygon.rings(), |p| position_z(p.x, p.y, p.z)),
        Shape::Multipoint(mp) => {
            geojson::Value::MultiPoint(mp.points().iter().map(|p| position(p.x, p.y)).collect())
        }
        Shape::MultipointM(mp) => {
            geojson::Value::MultiPoint(mp.points().iter().map(|p| position(p.x, p.y)).collect())
        }
        Shape::MultipointZ(mp) => geojson::Value::MultiPoint(
            mp.points().iter().map(|p| position_z(p.x, p.y, p.z)).collect(),
        ),
        Shape::Multipatch(_) => {
            return Err("Multipatch geometry type is not supported".to_string());
        }
    };
    Ok(Some(value))
}

/// Convert dBase field value to a property value
fn convert_dbase_value(value: &DbaseFieldValue) -> PropertyValue {
    match value {
        DbaseFieldValue::Character(Some(s)) => PropertyValue::String(s.trim_end().to_string()),
        DbaseFieldValue::Numeric(Some(n)) => number(*n),
        DbaseFieldValue::Logical(Some(b)) => PropertyValue::Bool(*b),
        DbaseFieldValue::Date(Some(date)) => PropertyValue::String(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        DbaseFieldValue::Float(Some(f)) => PropertyValue::Number(*f as f64),
        DbaseFieldValue::Integer(i) => PropertyValue::Integer(*i as i64),
        DbaseFieldValue::Currency(c) => PropertyValue::Number(*c),
        DbaseFieldValue::Double(d) => PropertyValue::Number(*d),
        DbaseFieldValue::Memo(s) => PropertyValue::String(s.clone()),
        DbaseFieldValue::Character(None)
        | DbaseFieldValue::Numeric(None)
        | DbaseFieldValue::Logical(None)
        | DbaseFieldValue::Date(None)
        | DbaseFieldValue::Float(None) => PropertyValue::Null,
        other => PropertyValue::String(format!("{:?}", other)),
    }
}

/// dBase numerics are f64 even for whole-number columns
fn number(n: f64) -> PropertyValue {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        PropertyValue::Integer(n as i64)
    } else {
        PropertyValue::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_patterns() {
        let reader = ShapefileFormatReader;
        assert_eq!(reader.patterns(), &["*.shp"]);
        assert_eq!(reader.format_name(), "Shapefile");
    }

    #[test]
    fn test_missing_components() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("parcels.shp");
        fs::write(&path, b"").unwrap();

        let err = ShapefileFormatReader.read(&path).unwrap_err();
        match err {
            GeoregionError::SourceFormatError { message, .. } => {
                assert!(message.contains(".shx"));
                assert!(message.contains(".dbf"));
            }
            other => panic!("Expected SourceFormatError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_epsg_from_wkt() {
        let wkt1 = r#"GEOGCS["WGS 84",AUTHORITY["EPSG","4326"]]"#;
        assert_eq!(parse_epsg_from_wkt(wkt1), Some(4326));

        let wkt2 = "EPSG:3857";
        assert_eq!(parse_epsg_from_wkt(wkt2), Some(3857));
    }

    #[test]
    fn test_outer_authority_wins() {
        let wkt = r#"PROJCS["ETRS89 / UTM zone 33N",GEOGCS["ETRS89",DATUM["European_Terrestrial_Reference_System_1989",SPHEROID["GRS 1980",6378137,298.257222101,AUTHORITY["EPSG","7019"]],AUTHORITY["EPSG","6258"]],AUTHORITY["EPSG","4258"]],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AUTHORITY["EPSG","25833"]]"#;
        assert_eq!(crs_from_prj(wkt).unwrap().epsg, 25833);
    }

    #[test]
    fn test_esri_names() {
        let geographic = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;
        assert_eq!(crs_from_prj(geographic).unwrap().epsg, 4326);

        let utm = r#"PROJCS["WGS_1984_UTM_Zone_33N",GEOGCS["GCS_WGS_1984"]]"#;
        assert_eq!(crs_from_prj(utm).unwrap().epsg, 32633);

        let south = r#"PROJCS["WGS_1984_UTM_Zone_21S",GEOGCS["GCS_WGS_1984"]]"#;
        assert_eq!(crs_from_prj(south).unwrap().epsg, 32721);

        assert!(crs_from_prj(r#"PROJCS["Local_Grid"]"#).is_none());
    }

    #[test]
    fn test_dbase_numeric_whole_numbers_become_integers() {
        assert_eq!(number(12.0), PropertyValue::Integer(12));
        assert_eq!(number(1.5), PropertyValue::Number(1.5));
    }

    fn ring_z(corners: &[(f64, f64)], z: f64) -> Vec<shapefile::PointZ> {
        corners
            .iter()
            .map(|&(x, y)| shapefile::PointZ::new(x, y, z, shapefile::NO_DATA))
            .collect()
    }

    fn write_lakes(path: &Path) {
        let table = shapefile::dbase::TableWriterBuilder::new()
            .add_character_field("NAME".try_into().unwrap(), 20)
            .add_numeric_field("DEPTH".try_into().unwrap(), 10, 0);
        let mut writer = shapefile::Writer::from_path(path, table).unwrap();

        let polygon = shapefile::PolygonZ::with_rings(vec![
            PolygonRing::Outer(ring_z(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)], 5.0)),
            PolygonRing::Inner(ring_z(&[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0), (1.0, 1.0)], 5.0)),
            PolygonRing::Outer(ring_z(&[(10.0, 10.0), (10.0, 12.0), (12.0, 12.0), (12.0, 10.0), (10.0, 10.0)], 7.0)),
        ]);

        let mut record = shapefile::dbase::Record::default();
        record.insert("NAME".to_string(), DbaseFieldValue::Character(Some("Lake".to_string())));
        record.insert("DEPTH".to_string(), DbaseFieldValue::Numeric(Some(12.0)));
        writer.write_shape_and_record(&polygon, &record).unwrap();
    }

    #[test]
    fn test_read_polygon_z_with_attributes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("lakes.shp");
        write_lakes(&path);

        let batch = ShapefileFormatReader.read(&path).unwrap();
        assert!(batch.crs.is_none());
        assert_eq!(batch.records.len(), 1);

        let record = &batch.records[0];
        assert_eq!(record.properties["NAME"], PropertyValue::from("Lake"));
        assert_eq!(record.properties["DEPTH"], PropertyValue::Integer(12));

        match &record.geometry {
            Some(geojson::Value::MultiPolygon(polygons)) => {
                assert_eq!(polygons.len(), 2);
                assert_eq!(polygons[0].len(), 2, "hole stays with its outer ring");
                assert_eq!(polygons[1].len(), 1);
                assert!(polygons[0].iter().flatten().all(|p| p.len() == 3 && p[2] == 5.0));
                assert!(polygons[1][0].iter().all(|p| p[2] == 7.0));
            }
            other => panic!("Expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_dotted_name_uses_own_sidecars() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("lakes.2020.shp");
        write_lakes(&path);
        fs::write(temp_dir.path().join("lakes.prj"), r#"PROJCS["x",AUTHORITY["EPSG","3857"]]"#)
            .unwrap();

        let batch = ShapefileFormatReader.read(&path).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert!(batch.crs.is_none());

        fs::write(
            temp_dir.path().join("lakes.2020.prj"),
            r#"PROJCS["WGS_1984_UTM_Zone_33N",GEOGCS["GCS_WGS_1984"]]"#,
        )
        .unwrap();
        let batch = ShapefileFormatReader.read(&path).unwrap();
        assert_eq!(batch.crs.map(|crs| crs.epsg), Some(32633));
    }
}

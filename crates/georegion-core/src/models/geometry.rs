//! Canonical geometry types used across all georegion crates.
//!
//! These types provide a bridge between GeoJSON serialization and the
//! computational geo crate types. Canonical geometry is always 2-D.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GeoregionError, Result};

/// Coordinate Reference System identified by EPSG code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self { epsg, name: name.into() }
    }

    /// An EPSG code without a known display name
    pub fn epsg(epsg: u32) -> Self {
        let name = match epsg {
            4326 => "WGS 84",
            3857 => "Web Mercator",
            _ => "",
        };
        Self::new(epsg, name)
    }

    /// WGS 84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::new(3857, "Web Mercator")
    }

    /// The single CRS all persisted and queried geometry is expressed in
    pub fn canonical() -> Self {
        Self::wgs84()
    }

    /// Two CRS are the same when their EPSG codes match; names are informational
    pub fn same_as(&self, other: &Crs) -> bool {
        self.epsg == other.epsg
    }

    pub fn is_canonical(&self) -> bool {
        self.same_as(&Crs::canonical())
    }

    /// Authority string understood by PROJ, e.g. `EPSG:4326`
    pub fn authority(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "EPSG:{}", self.epsg)
        } else {
            write!(f, "EPSG:{} ({})", self.epsg, self.name)
        }
    }
}

/// How a Z ordinate is removed during normalization (configuration form)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DimensionMode {
    /// Drop Z from every position, keeping X/Y untouched
    #[default]
    Flatten,
    /// Expand then shrink areal geometry by a fixed distance
    TidyBuffer,
}

impl FromStr for DimensionMode {
    type Err = GeoregionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "flatten" => Ok(DimensionMode::Flatten),
            "tidy_buffer" | "buffer" => Ok(DimensionMode::TidyBuffer),
            _ => Err(GeoregionError::ConfigInvalid {
                key: "dimension_policy".to_string(),
                reason: format!("Invalid dimension policy: {}. Use flatten or tidy_buffer", s),
            }),
        }
    }
}

/// Resolved dimensionality policy handed to the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DimensionPolicy {
    #[default]
    Flatten,
    /// Buffer distance is in units of the canonical CRS (degrees)
    TidyBuffer { distance: f64 },
}

impl DimensionPolicy {
    pub fn from_mode(mode: DimensionMode, distance: f64) -> Self {
        match mode {
            DimensionMode::Flatten => DimensionPolicy::Flatten,
            DimensionMode::TidyBuffer => DimensionPolicy::TidyBuffer { distance },
        }
    }
}

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

/// GeoJSON-compatible 2-D geometry representation
///
/// This enum directly maps to GeoJSON geometry types with coordinate arrays.
/// It can be serialized/deserialized as GeoJSON and converted to/from `geo` crate types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        Geometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }
}

/// Axis-aligned query box in canonical CRS units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        let values = [min_x, min_y, max_x, max_y];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeoregionError::ConfigInvalid {
                key: "bbox".to_string(),
                reason: "Bounding box values must be finite".to_string(),
            });
        }
        if min_x > max_x || min_y > max_y {
            return Err(GeoregionError::ConfigInvalid {
                key: "bbox".to_string(),
                reason: format!(
                    "Minimum must not exceed maximum, got ({}, {}, {}, {})",
                    min_x, min_y, max_x, max_y
                ),
            });
        }
        Ok(Self { min_x, min_y, max_x, max_y })
    }

    /// Closed, counter-clockwise polygon covering the box
    pub fn to_geometry(&self) -> Geometry {
        Geometry::polygon(vec![vec![
            [self.min_x, self.min_y],
            [self.max_x, self.min_y],
            [self.max_x, self.max_y],
            [self.min_x, self.max_y],
            [self.min_x, self.min_y],
        ]])
    }
}

impl FromStr for BoundingBox {
    type Err = GeoregionError;

    /// Parse `min_x,min_y,max_x,max_y`
    fn from_str(s: &str) -> Result<Self> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| GeoregionError::ConfigInvalid {
                key: "bbox".to_string(),
                reason: format!("Invalid number in '{}': {}", s, e),
            })?;

        match values.as_slice() {
            [min_x, min_y, max_x, max_y] => Self::new(*min_x, *min_y, *max_x, *max_y),
            _ => Err(GeoregionError::ConfigInvalid {
                key: "bbox".to_string(),
                reason: format!("Expected 4 comma-separated values, got {}", values.len()),
            }),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_serialization() {
        let point = Geometry::point(17.5, 40.5);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("Point"));
        assert!(json.contains("17.5"));

        let parsed: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(point, parsed);
    }

    #[test]
    fn test_three_dimensional_geometry_is_rejected() {
        let value = serde_json::json!({"type": "Point", "coordinates": [1.0, 2.0, 3.0]});
        assert!(serde_json::from_value::<Geometry>(value).is_err());
    }

    #[test]
    fn test_crs_match_ignores_name() {
        assert!(Crs::new(4326, "").same_as(&Crs::wgs84()));
        assert!(!Crs::web_mercator().is_canonical());
        assert_eq!(Crs::epsg(3857).to_string(), "EPSG:3857 (Web Mercator)");
        assert_eq!(Crs::epsg(25833).to_string(), "EPSG:25833");
    }

    #[test]
    fn test_bbox_parse() {
        let bbox: BoundingBox = "17,40,18,41".parse().unwrap();
        assert_eq!(bbox, BoundingBox::new(17.0, 40.0, 18.0, 41.0).unwrap());
        assert_eq!(bbox.to_string(), "(17, 40, 18, 41)");

        assert!("17,40,18".parse::<BoundingBox>().is_err());
        assert!("18,40,17,41".parse::<BoundingBox>().is_err());
        assert!("a,b,c,d".parse::<BoundingBox>().is_err());
    }

    #[test]
    fn test_bbox_polygon_is_closed() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 2.0).unwrap();
        match bbox.to_geometry() {
            Geometry::Polygon { coordinates } => {
                assert_eq!(coordinates.len(), 1);
                assert_eq!(coordinates[0].first(), coordinates[0].last());
                assert_eq!(coordinates[0][2], [1.0, 2.0]);
            }
            other => panic!("Expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_dimension_mode_parse() {
        assert_eq!("flatten".parse::<DimensionMode>().unwrap(), DimensionMode::Flatten);
        assert_eq!("Tidy-Buffer".parse::<DimensionMode>().unwrap(), DimensionMode::TidyBuffer);
        assert!("round".parse::<DimensionMode>().is_err());
        assert_eq!(
            DimensionPolicy::from_mode(DimensionMode::TidyBuffer, 0.5),
            DimensionPolicy::TidyBuffer { distance: 0.5 }
        );
    }
}

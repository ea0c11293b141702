//! Removal of the Z ordinate from raw geometry
//!
//! Two policies are available:
//!
//! * `Flatten` keeps X/Y of every position exactly and drops any further ordinate.
//! * `TidyBuffer { distance }` buffers areal geometry outward by `distance` and
//!   back inward by the same amount. With the default distance of 1.0 degree
//!   this closes gaps and slivers narrower than about 2 degrees, fills holes
//!   of similar width and rounds convex corners; parts thinner than 2 degrees
//!   can vanish. Points and lines have no area to buffer back to, so they are
//!   flattened under both policies.
//!
//! Geometry already in 2-D is converted without modification under either policy.

use geo::Buffer;
use georegion_core::error::{GeoregionError, Result};
use georegion_core::models::{DimensionPolicy, Geometry};

use crate::models::{from_geo_multi_polygon, to_geo_geometry};

/// True when any position carries a third ordinate
pub fn has_z(value: &geojson::Value) -> bool {
    use geojson::Value;

    fn line_has_z(line: &[Vec<f64>]) -> bool {
        line.iter().any(|p| p.len() > 2)
    }

    match value {
        Value::Point(p) => p.len() > 2,
        Value::LineString(ls) | Value::MultiPoint(ls) => line_has_z(ls),
        Value::Polygon(rings) | Value::MultiLineString(rings) => {
            rings.iter().any(|ring| line_has_z(ring))
        }
        Value::MultiPolygon(polygons) => {
            polygons.iter().flatten().any(|ring| line_has_z(ring))
        }
        Value::GeometryCollection(members) => members.iter().any(|g| has_z(&g.value)),
    }
}

fn planar(position: &[f64]) -> Result<[f64; 2]> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok([*x, *y]),
        [_, _, ..] => Err(GeoregionError::geometry("position", "coordinates must be finite")),
        _ => Err(GeoregionError::geometry(
            "position",
            format!("expected at least 2 ordinates, found {}", position.len()),
        )),
    }
}

fn planar_line(line: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
    line.iter().map(|p| planar(p)).collect()
}

fn planar_rings(rings: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<[f64; 2]>>> {
    rings.iter().map(|ring| planar_line(ring)).collect()
}

/// Drop every ordinate beyond X/Y
pub fn flatten(value: &geojson::Value) -> Result<Geometry> {
    use geojson::Value;

    let geometry = match value {
        Value::Point(p) => Geometry::Point { coordinates: planar(p)? },
        Value::LineString(ls) => Geometry::LineString { coordinates: planar_line(ls)? },
        Value::Polygon(rings) => Geometry::Polygon { coordinates: planar_rings(rings)? },
        Value::MultiPoint(points) => Geometry::MultiPoint { coordinates: planar_line(points)? },
        Value::MultiLineString(lines) => {
            Geometry::MultiLineString { coordinates: planar_rings(lines)? }
        }
        Value::MultiPolygon(polygons) => Geometry::MultiPolygon {
            coordinates: polygons.iter().map(|p| planar_rings(p)).collect::<Result<_>>()?,
        },
        Value::GeometryCollection(_) => {
            return Err(GeoregionError::geometry(
                "GeometryCollection",
                "geometry collections are not supported",
            ))
        }
    };
    Ok(geometry)
}

/// Expand then shrink areal geometry; other types pass through
pub fn tidy_buffer(geometry: Geometry, distance: f64) -> Result<Geometry> {
    let areal = match to_geo_geometry(&geometry) {
        geo::Geometry::Polygon(p) => geo::MultiPolygon::new(vec![p]),
        geo::Geometry::MultiPolygon(mp) => mp,
        _ => return Ok(geometry),
    };

    let tidied = areal.buffer(distance).buffer(-distance);
    if tidied.0.is_empty() {
        return Err(GeoregionError::geometry(
            format!("{:?}", geometry.geometry_type()),
            format!("tidy buffer of {} collapsed the geometry", distance),
        ));
    }

    Ok(from_geo_multi_polygon(&tidied))
}

/// Convert raw geometry to canonical 2-D geometry under the given policy
pub fn to_planar(value: &geojson::Value, policy: DimensionPolicy) -> Result<Geometry> {
    let flat = flatten(value)?;
    match policy {
        DimensionPolicy::TidyBuffer { distance } if has_z(value) => tidy_buffer(flat, distance),
        _ => Ok(flat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn square_z(size: f64) -> geojson::Value {
        geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0, 10.0],
            vec![size, 0.0, 10.0],
            vec![size, size, 10.0],
            vec![0.0, size, 10.0],
            vec![0.0, 0.0, 10.0],
        ]])
    }

    #[test]
    fn test_has_z() {
        assert!(!has_z(&geojson::Value::Point(vec![1.0, 2.0])));
        assert!(has_z(&geojson::Value::Point(vec![1.0, 2.0, 3.0])));
        assert!(has_z(&square_z(1.0)));
        assert!(has_z(&geojson::Value::MultiPolygon(vec![vec![vec![vec![0.0, 0.0, 1.0]]]])));
    }

    #[test]
    fn test_flatten_keeps_xy() {
        let value = geojson::Value::Point(vec![17.5, 40.5, 99.0]);
        assert_eq!(flatten(&value).unwrap(), Geometry::point(17.5, 40.5));
    }

    #[test]
    fn test_flatten_rejects_nan_and_short_positions() {
        assert!(flatten(&geojson::Value::Point(vec![f64::NAN, 1.0])).is_err());
        assert!(flatten(&geojson::Value::LineString(vec![vec![1.0]])).is_err());
    }

    #[test]
    fn test_two_dimensional_geometry_is_not_buffered() {
        let value = geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]]);
        let policy = DimensionPolicy::TidyBuffer { distance: 1.0 };
        assert_eq!(to_planar(&value, policy).unwrap(), flatten(&value).unwrap());
    }

    #[test]
    fn test_tidy_buffer_preserves_large_square() {
        let policy = DimensionPolicy::TidyBuffer { distance: 1.0 };
        let geometry = to_planar(&square_z(10.0), policy).unwrap();

        let area = to_geo_geometry(&geometry).unsigned_area();
        assert!((area - 100.0).abs() < 1.0, "area after tidy buffer was {}", area);
    }

    #[test]
    fn test_tidy_buffer_flattens_points() {
        let policy = DimensionPolicy::TidyBuffer { distance: 1.0 };
        let value = geojson::Value::Point(vec![1.0, 2.0, 3.0]);
        assert_eq!(to_planar(&value, policy).unwrap(), Geometry::point(1.0, 2.0));
    }
}

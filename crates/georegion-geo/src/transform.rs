//! CRS transformation of raw source geometry

use georegion_core::error::{GeoregionError, Result};
use georegion_core::models::Crs;
use georegion_core::ports::{CoordinateTransform, Reprojector};
use proj::Proj;

/// Check if two CRS are the same
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.same_as(crs2)
}

/// Pass-through transform used when source and target CRS already agree
pub struct IdentityTransform;

impl CoordinateTransform for IdentityTransform {
    fn convert(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok((x, y))
    }
}

struct ProjTransform {
    proj: Proj,
    from: Crs,
}

impl CoordinateTransform for ProjTransform {
    fn convert(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self.proj.convert((x, y)).map_err(|e| {
            GeoregionError::geometry(
                format!("reprojection from {}", self.from),
                format!("({}, {}): {}", x, y, e),
            )
        })
    }
}

/// PROJ-backed reprojector
///
/// `Proj::new_known_crs` normalizes axis order, so geographic output is (lon, lat).
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjReprojector;

impl Reprojector for ProjReprojector {
    fn transform(&self, from: &Crs, to: &Crs) -> Result<Box<dyn CoordinateTransform>> {
        if crs_match(from, to) {
            return Ok(Box::new(IdentityTransform));
        }

        let (from_def, to_def) = (from.authority(), to.authority());
        tracing::debug!("Creating projection {} -> {}", from_def, to_def);

        let proj = Proj::new_known_crs(&from_def, &to_def, None).map_err(|e| {
            GeoregionError::CrsError {
                crs: from.to_string(),
                reason: format!("Failed to create projection to {}: {}", to_def, e),
            }
        })?;

        Ok(Box::new(ProjTransform { proj, from: from.clone() }))
    }
}

fn reproject_position(position: &[f64], transform: &dyn CoordinateTransform) -> Result<Vec<f64>> {
    match position {
        [x, y, rest @ ..] => {
            let (tx, ty) = transform.convert(*x, *y)?;
            let mut out = Vec::with_capacity(position.len());
            out.push(tx);
            out.push(ty);
            out.extend_from_slice(rest);
            Ok(out)
        }
        _ => Err(GeoregionError::geometry(
            "position",
            format!("expected at least 2 ordinates, found {}", position.len()),
        )),
    }
}

fn reproject_line(line: &[Vec<f64>], transform: &dyn CoordinateTransform) -> Result<Vec<Vec<f64>>> {
    line.iter().map(|p| reproject_position(p, transform)).collect()
}

fn reproject_rings(
    rings: &[Vec<Vec<f64>>],
    transform: &dyn CoordinateTransform,
) -> Result<Vec<Vec<Vec<f64>>>> {
    rings.iter().map(|ring| reproject_line(ring, transform)).collect()
}

/// Reproject every position of a raw geometry, carrying any Z ordinate along unchanged
pub fn reproject_value(
    value: &geojson::Value,
    transform: &dyn CoordinateTransform,
) -> Result<geojson::Value> {
    use geojson::Value;

    let transformed = match value {
        Value::Point(p) => Value::Point(reproject_position(p, transform)?),
        Value::LineString(ls) => Value::LineString(reproject_line(ls, transform)?),
        Value::Polygon(rings) => Value::Polygon(reproject_rings(rings, transform)?),
        Value::MultiPoint(points) => Value::MultiPoint(reproject_line(points, transform)?),
        Value::MultiLineString(lines) => Value::MultiLineString(reproject_rings(lines, transform)?),
        Value::MultiPolygon(polygons) => Value::MultiPolygon(
            polygons
                .iter()
                .map(|rings| reproject_rings(rings, transform))
                .collect::<Result<_>>()?,
        ),
        Value::GeometryCollection(_) => {
            return Err(GeoregionError::geometry(
                "GeometryCollection",
                "geometry collections are not supported",
            ))
        }
    };

    Ok(transformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shift(f64);

    impl CoordinateTransform for Shift {
        fn convert(&self, x: f64, y: f64) -> Result<(f64, f64)> {
            Ok((x + self.0, y - self.0))
        }
    }

    #[test]
    fn test_same_crs_is_identity() {
        let transform = ProjReprojector.transform(&Crs::wgs84(), &Crs::epsg(4326)).unwrap();
        assert_eq!(transform.convert(17.5, 40.5).unwrap(), (17.5, 40.5));
    }

    #[test]
    fn test_reproject_keeps_z() {
        let value = geojson::Value::LineString(vec![vec![0.0, 0.0, 5.0], vec![1.0, 1.0, 6.0]]);
        let out = reproject_value(&value, &Shift(10.0)).unwrap();
        assert_eq!(
            out,
            geojson::Value::LineString(vec![vec![10.0, -10.0, 5.0], vec![11.0, -9.0, 6.0]])
        );
    }

    #[test]
    fn test_reproject_multipolygon() {
        let ring = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]];
        let value = geojson::Value::MultiPolygon(vec![vec![ring.clone()], vec![ring]]);
        match reproject_value(&value, &Shift(1.0)).unwrap() {
            geojson::Value::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                assert_eq!(polygons[1][0][2], vec![2.0, 0.0]);
            }
            other => panic!("Expected multipolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_short_position_is_rejected() {
        let value = geojson::Value::Point(vec![1.0]);
        assert!(reproject_value(&value, &IdentityTransform).is_err());
    }
}

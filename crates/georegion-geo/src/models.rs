//! Conversions between canonical geometry and the `geo` crate.

use geo::Geometry as GeoGeometry;

pub use georegion_core::models::{BoundingBox, Crs, Geometry, GeometryType};

fn coord(c: &[f64; 2]) -> geo::Coord {
    geo::Coord { x: c[0], y: c[1] }
}

fn line_string(coords: &[[f64; 2]]) -> geo::LineString {
    geo::LineString::new(coords.iter().map(coord).collect())
}

fn polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    match rings.split_first() {
        Some((exterior, interiors)) => geo::Polygon::new(
            line_string(exterior),
            interiors.iter().map(|ring| line_string(ring)).collect(),
        ),
        None => geo::Polygon::new(geo::LineString::new(vec![]), vec![]),
    }
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::LineString { coordinates } => GeoGeometry::LineString(line_string(coordinates)),
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(geo::MultiPoint::new(
            coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
        )),
        Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
            geo::MultiLineString::new(coordinates.iter().map(|l| line_string(l)).collect()),
        ),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(
            geo::MultiPolygon::new(coordinates.iter().map(|p| polygon(p)).collect()),
        ),
    }
}

fn rings_of(p: &geo::Polygon) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(p.exterior())
        .chain(p.interiors().iter())
        .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
        .collect()
}

/// Convert a geo::Geometry to a canonical Geometry
///
/// Returns None for geometry collections, which have no canonical form.
pub fn from_geo_geometry(geom: &GeoGeometry) -> Option<Geometry> {
    let converted = match geom {
        GeoGeometry::Point(p) => Geometry::Point { coordinates: [p.x(), p.y()] },
        GeoGeometry::Line(l) => Geometry::LineString {
            coordinates: vec![[l.start.x, l.start.y], [l.end.x, l.end.y]],
        },
        GeoGeometry::LineString(ls) => Geometry::LineString {
            coordinates: ls.coords().map(|c| [c.x, c.y]).collect(),
        },
        GeoGeometry::Polygon(p) => Geometry::Polygon { coordinates: rings_of(p) },
        GeoGeometry::MultiPoint(mp) => Geometry::MultiPoint {
            coordinates: mp.iter().map(|p| [p.x(), p.y()]).collect(),
        },
        GeoGeometry::MultiLineString(mls) => Geometry::MultiLineString {
            coordinates: mls.iter().map(|ls| ls.coords().map(|c| [c.x, c.y]).collect()).collect(),
        },
        GeoGeometry::MultiPolygon(mp) => {
            Geometry::MultiPolygon { coordinates: mp.iter().map(rings_of).collect() }
        }
        GeoGeometry::Rect(r) => return from_geo_geometry(&GeoGeometry::Polygon(r.to_polygon())),
        GeoGeometry::Triangle(t) => {
            return from_geo_geometry(&GeoGeometry::Polygon(t.to_polygon()))
        }
        GeoGeometry::GeometryCollection(_) => return None,
    };
    Some(converted)
}

/// Collapse a single-member multipolygon to a polygon
pub fn from_geo_multi_polygon(mp: &geo::MultiPolygon) -> Geometry {
    match mp.0.as_slice() {
        [single] => Geometry::Polygon { coordinates: rings_of(single) },
        many => Geometry::MultiPolygon { coordinates: many.iter().map(rings_of).collect() },
    }
}

/// Extension trait for Geometry with geo-crate operations
pub trait GeometryExt {
    /// Convert to geo::Geometry
    fn to_geo(&self) -> GeoGeometry;

    /// Axis-aligned extent; None for empty geometry
    fn bounding_box(&self) -> Option<BoundingBox>;
}

impl GeometryExt for Geometry {
    fn to_geo(&self) -> GeoGeometry {
        to_geo_geometry(self)
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        use geo::algorithm::bounding_rect::BoundingRect;
        let rect = self.to_geo().bounding_rect()?;
        Some(BoundingBox {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_roundtrip() {
        let geom = Geometry::point(17.5, 40.5);
        let back = from_geo_geometry(&to_geo_geometry(&geom)).unwrap();
        assert_eq!(geom, back);
    }

    #[test]
    fn test_polygon_with_hole_roundtrip() {
        let geom = Geometry::polygon(vec![
            vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
            vec![[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]],
        ]);
        let back = from_geo_geometry(&to_geo_geometry(&geom)).unwrap();
        assert_eq!(geom, back);
    }

    #[test]
    fn test_single_multipolygon_collapses() {
        let square = geo::Polygon::new(
            geo::LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        );
        let mp = geo::MultiPolygon::new(vec![square]);
        assert!(matches!(from_geo_multi_polygon(&mp), Geometry::Polygon { .. }));
    }

    #[test]
    fn test_bounding_box() {
        let geom = Geometry::line_string(vec![[17.0, 41.0], [18.0, 40.0]]);
        let bbox = geom.bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox::new(17.0, 40.0, 18.0, 41.0).unwrap());
    }

    #[test]
    fn test_collection_has_no_canonical_form() {
        let gc = GeoGeometry::GeometryCollection(geo::GeometryCollection(vec![]));
        assert!(from_geo_geometry(&gc).is_none());
    }
}

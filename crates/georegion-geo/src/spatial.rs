use geo::algorithm::intersects::Intersects;
use geo::Geometry as GeoGeometry;

use crate::models::{to_geo_geometry, BoundingBox, Geometry, GeometryExt};

/// A query geometry converted once and reused across many candidate tests
pub struct PreparedQuery {
    geometry: GeoGeometry,
    extent: Option<BoundingBox>,
}

impl PreparedQuery {
    pub fn new(query: &Geometry) -> Self {
        Self { geometry: to_geo_geometry(query), extent: query.bounding_box() }
    }

    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self::new(&bbox.to_geometry())
    }

    /// Standard 2-D intersection; shared boundary points count
    pub fn intersects(&self, candidate: &Geometry) -> bool {
        if let (Some(query_box), Some(candidate_box)) = (&self.extent, candidate.bounding_box()) {
            if !bounding_boxes_intersect(query_box, &candidate_box) {
                return false;
            }
        }
        to_geo_geometry(candidate).intersects(&self.geometry)
    }
}

/// Check if geometry intersects the query geometry
pub fn intersects(geometry: &Geometry, query: &Geometry) -> bool {
    to_geo_geometry(geometry).intersects(&to_geo_geometry(query))
}

/// Check if two bounding boxes intersect (closed intervals)
pub fn bounding_boxes_intersect(a: &BoundingBox, b: &BoundingBox) -> bool {
    let x_overlap = a.min_x <= b.max_x && a.max_x >= b.min_x;
    let y_overlap = a.min_y <= b.max_y && a.max_y >= b.min_y;

    x_overlap && y_overlap
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox::new(17.0, 40.0, 18.0, 41.0).unwrap()
    }

    #[test]
    fn test_point_inside_box() {
        let query = PreparedQuery::from_bbox(&bbox());
        assert!(query.intersects(&Geometry::point(17.5, 40.5)));
        assert!(!query.intersects(&Geometry::point(0.0, 0.0)));
    }

    #[test]
    fn test_polygon_touching_boundary_intersects() {
        let touching = Geometry::polygon(vec![vec![
            [18.0, 40.0],
            [19.0, 40.0],
            [19.0, 41.0],
            [18.0, 41.0],
            [18.0, 40.0],
        ]]);
        assert!(PreparedQuery::from_bbox(&bbox()).intersects(&touching));
        assert!(intersects(&touching, &bbox().to_geometry()));
    }

    #[test]
    fn test_corner_touch_intersects() {
        let corner = Geometry::point(18.0, 41.0);
        assert!(PreparedQuery::from_bbox(&bbox()).intersects(&corner));
    }

    #[test]
    fn test_line_crossing_box_without_vertices_inside() {
        let line = Geometry::line_string(vec![[16.0, 40.5], [19.0, 40.5]]);
        assert!(PreparedQuery::from_bbox(&bbox()).intersects(&line));
    }

    #[test]
    fn test_box_inside_polygon_hole_does_not_intersect() {
        let donut = Geometry::polygon(vec![
            vec![[10.0, 30.0], [30.0, 30.0], [30.0, 50.0], [10.0, 50.0], [10.0, 30.0]],
            vec![[16.0, 39.0], [19.0, 39.0], [19.0, 42.0], [16.0, 42.0], [16.0, 39.0]],
        ]);
        assert!(!PreparedQuery::from_bbox(&bbox()).intersects(&donut));
    }

    #[test]
    fn test_bounding_boxes_intersect() {
        let other = BoundingBox::new(18.0, 41.0, 20.0, 42.0).unwrap();
        assert!(bounding_boxes_intersect(&bbox(), &other));

        let apart = BoundingBox::new(18.1, 41.1, 20.0, 42.0).unwrap();
        assert!(!bounding_boxes_intersect(&bbox(), &apart));
    }
}

//! Property tests for Z removal and the intersection predicate

use georegion_core::models::{BoundingBox, DimensionPolicy, Geometry};
use georegion_geo::dimension::{flatten, has_z, to_planar};
use georegion_geo::spatial::PreparedQuery;
use proptest::prelude::*;

fn ordinate() -> impl Strategy<Value = f64> {
    -180.0f64..180.0
}

proptest! {
    #[test]
    fn flatten_preserves_xy_of_every_point(x in ordinate(), y in ordinate(), z in -1000.0f64..1000.0) {
        let value = geojson::Value::Point(vec![x, y, z]);
        prop_assert!(has_z(&value));
        prop_assert_eq!(flatten(&value).unwrap(), Geometry::point(x, y));
    }

    #[test]
    fn flatten_is_noop_on_planar_lines(coords in prop::collection::vec((ordinate(), ordinate()), 2..20)) {
        let value = geojson::Value::LineString(coords.iter().map(|(x, y)| vec![*x, *y]).collect());
        let expected = Geometry::line_string(coords.iter().map(|(x, y)| [*x, *y]).collect());

        let policy = DimensionPolicy::TidyBuffer { distance: 1.0 };
        prop_assert_eq!(to_planar(&value, policy).unwrap(), expected);
    }

    #[test]
    fn points_inside_box_intersect(
        min_x in -170.0f64..160.0,
        min_y in -80.0f64..70.0,
        w in 0.1f64..10.0,
        h in 0.1f64..10.0,
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        let bbox = BoundingBox::new(min_x, min_y, min_x + w, min_y + h).unwrap();
        let query = PreparedQuery::from_bbox(&bbox);

        let inside = Geometry::point(min_x + w * fx, min_y + h * fy);
        prop_assert!(query.intersects(&inside));

        let outside = Geometry::point(min_x + w + 1.0, min_y - 1.0);
        prop_assert!(!query.intersects(&outside));
    }
}

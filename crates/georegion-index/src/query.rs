//! Spatial Query Engine
//!
//! Linear scan: every feature is tested once per query.

use georegion_core::models::{BoundingBox, Feature, FeatureMap, Geometry};
use georegion_geo::spatial::PreparedQuery;

/// Features intersecting a query, in the flat map's encounter order
#[derive(Debug, Clone, Default)]
pub struct Matches<'a> {
    features: Vec<&'a Feature>,
}

impl<'a> Matches<'a> {
    pub fn get(&self, id: &str) -> Option<&'a Feature> {
        self.features.iter().copied().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Feature> + '_ {
        self.features.iter().copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.features.iter().map(|f| f.id.as_str())
    }
}

pub struct SpatialQueryEngine;

impl SpatialQueryEngine {
    /// Features whose geometry intersects `geometry`; boundary contact counts
    pub fn query<'a>(features: &'a FeatureMap, geometry: &Geometry) -> Matches<'a> {
        let prepared = PreparedQuery::new(geometry);
        Matches { features: features.iter().filter(|f| prepared.intersects(&f.geometry)).collect() }
    }

    pub fn query_bbox<'a>(features: &'a FeatureMap, bbox: &BoundingBox) -> Matches<'a> {
        Self::query(features, &bbox.to_geometry())
    }
}

//! Region Index (read path)

use georegion_core::error::{GeoregionError, Result};
use georegion_core::models::{BoundingBox, Feature, FeatureMap, Geometry, RegionHierarchy};

use crate::query::{Matches, SpatialQueryEngine};

/// Hierarchy plus flat identifier map, built once and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    hierarchy: RegionHierarchy,
    features: FeatureMap,
}

impl RegionIndex {
    /// Index features in one pass
    ///
    /// A repeated identifier replaces the earlier feature in the flat map and is
    /// appended again under its own hierarchy position. Features lacking either
    /// hierarchy attribute are kept in the flat map only.
    pub fn build<I>(features: I) -> Self
    where
        I: IntoIterator<Item = Feature>,
    {
        let mut index = Self::default();
        for feature in features {
            index.insert(feature);
        }
        index
    }

    /// Like [`RegionIndex::build`] but a repeated identifier is an error
    pub fn build_strict<I>(features: I) -> Result<Self>
    where
        I: IntoIterator<Item = Feature>,
    {
        let mut index = Self::default();
        for feature in features {
            if index.features.contains(&feature.id) {
                return Err(GeoregionError::DuplicateIdentifier { id: feature.id });
            }
            index.insert(feature);
        }
        Ok(index)
    }

    fn insert(&mut self, feature: Feature) {
        if let Some((region, sub_region)) = feature.hierarchy_position() {
            self.hierarchy.insert(region, sub_region, feature.id.clone());
        }
        if let Some(replaced) = self.features.insert(feature) {
            tracing::debug!("Feature {} replaced by a later duplicate", replaced.id);
        }
    }

    pub fn hierarchy(&self) -> &RegionHierarchy {
        &self.hierarchy
    }

    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn query(&self, geometry: &Geometry) -> Matches<'_> {
        SpatialQueryEngine::query(&self.features, geometry)
    }

    pub fn query_bbox(&self, bbox: &BoundingBox) -> Matches<'_> {
        SpatialQueryEngine::query_bbox(&self.features, bbox)
    }
}

pub mod feature;
pub mod geometry;
pub mod hierarchy;

pub use feature::{
    identifier_of, Feature, FeatureCollection, FeatureMap, Properties, PropertyValue, RawRecord,
    SourceBatch, ID_FALLBACK_KEY, ID_KEY, REGION_NAME_KEY, SUB_REGION_NAME_KEY,
};
pub use geometry::{BoundingBox, Crs, DimensionMode, DimensionPolicy, Geometry, GeometryType};
pub use hierarchy::RegionHierarchy;

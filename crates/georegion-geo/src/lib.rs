//! GeoRegion Geo - Geometry, CRS, and spatial operations
//!
//! This crate handles the geospatial primitives used by the normalizer and the
//! query engine: conversions to the `geo` crate, CRS transformation, removal of
//! the Z ordinate, and intersection predicates.

pub mod dimension;
pub mod models;
pub mod spatial;
pub mod transform;

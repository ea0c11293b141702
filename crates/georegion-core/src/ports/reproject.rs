use crate::error::Result;
use crate::models::Crs;

/// A prepared transformation between two fixed CRS
pub trait CoordinateTransform {
    fn convert(&self, x: f64, y: f64) -> Result<(f64, f64)>;
}

/// Port for building coordinate transformations
///
/// Callers build one transform per source batch and reuse it for every position.
pub trait Reprojector {
    fn transform(&self, from: &Crs, to: &Crs) -> Result<Box<dyn CoordinateTransform>>;
}

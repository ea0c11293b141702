//! Port trait definitions
//!
//! These traits define the capabilities the normalization engine calls out to.

pub mod ids;
pub mod reproject;
pub mod sink;

pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use reproject::{CoordinateTransform, Reprojector};
pub use sink::Sink;

//! GeoRegion Index - Normalization, hierarchy building and spatial queries
//!
//! Write path: [`HierarchyBuilder`] walks `region/sub_region/*` source trees and
//! pushes one normalized collection per sub-region into a [`Sink`](georegion_core::ports::Sink).
//!
//! Read path: [`load_collections`] re-reads persisted collections, [`RegionIndex`]
//! organizes them and [`SpatialQueryEngine`] answers intersection queries.

pub mod builder;
pub mod index;
pub mod loader;
pub mod normalize;
pub mod query;
pub mod sink;

pub use builder::{BuildSummary, HierarchyBuilder};
pub use index::RegionIndex;
pub use loader::load_collections;
pub use normalize::GeometryNormalizer;
pub use query::{Matches, SpatialQueryEngine};
pub use sink::{GeoJsonFileSink, MemorySink};

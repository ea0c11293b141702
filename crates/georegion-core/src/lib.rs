//! GeoRegion Core - Domain models, ports, source formats and configuration
//!
//! This crate contains the canonical feature model shared by the write and read
//! paths, the error taxonomy, and the capability interfaces the engine calls out to.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod ports;

pub use error::{GeoregionError, Result};

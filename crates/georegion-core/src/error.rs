//! Error types for GeoRegion

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoregionError {
    // Load errors
    #[error("Feature in {source_file} has neither 'ID' nor 'id' property: {record}")]
    MissingIdentifier { source_file: String, record: String },

    #[error("Duplicate feature identifier: {id}")]
    DuplicateIdentifier { id: String },

    // Geometry errors
    #[error("Geometry error in {context}: {reason}")]
    GeometryError { context: String, reason: String },

    #[error("Cannot transform from {crs}: {reason}")]
    CrsError { crs: String, reason: String },

    // Format errors
    #[error("{format} error in {path}: {message}")]
    SourceFormatError {
        format: String,
        path: PathBuf,
        message: String,
    },

    #[error("No registered reader for {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeoregionError {
    /// Shorthand for a geometry failure tied to a feature or file
    pub fn geometry(context: impl Into<String>, reason: impl Into<String>) -> Self {
        GeoregionError::GeometryError { context: context.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, GeoregionError>;

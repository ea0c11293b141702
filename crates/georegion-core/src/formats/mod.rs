//! Format abstraction layer for multi-format support
//!
//! Each source format implements the `FormatReader` trait and declares the
//! file-name glob patterns it handles. The `FormatRegistry` matches files
//! against those patterns and dispatches to the first reader that claims them.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GeoregionError, Result};
use crate::models::SourceBatch;

pub mod geojson;
pub mod pins;
pub mod shapefile;
pub mod wkt;

/// Format reader trait that all format implementations must implement
pub trait FormatReader {
    /// Read every record from the given file
    fn read(&self, path: &Path) -> Result<SourceBatch>;

    /// File-name glob patterns (e.g., ["*.shp"], ["*_pins.txt"])
    fn patterns(&self) -> &[&str];

    /// Get human-readable format name (e.g., "Shapefile", "WKT")
    fn format_name(&self) -> &str;
}

/// Read a source file as text, reporting failures against that file
pub(crate) fn read_text(path: &Path, format: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| GeoregionError::SourceFormatError {
        format: format.to_string(),
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })
}

struct RegisteredReader {
    reader: Box<dyn FormatReader>,
    matcher: GlobSet,
}

/// Central registry for format readers
///
/// Registration order is significant: it is the discovery order used when a
/// directory of mixed sources is planned, and the tie-breaker when more than
/// one reader matches the same file.
pub struct FormatRegistry {
    readers: Vec<RegisteredReader>,
}

impl FormatRegistry {
    /// Create a new empty format registry
    pub fn new() -> Self {
        Self { readers: Vec::new() }
    }

    /// Registry holding the write-path source formats: Shapefile, WKT, pins
    pub fn with_source_formats() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(shapefile::ShapefileFormatReader))?;
        registry.register(Box::new(wkt::WktReader))?;
        registry.register(Box::new(pins::PinsReader))?;
        Ok(registry)
    }

    /// Register a format reader
    pub fn register(&mut self, reader: Box<dyn FormatReader>) -> Result<()> {
        let mut builder = GlobSetBuilder::new();
        for pattern in reader.patterns() {
            let glob = Glob::new(pattern).map_err(|e| GeoregionError::ConfigInvalid {
                key: format!("{} pattern", reader.format_name()),
                reason: e.to_string(),
            })?;
            builder.add(glob);
        }
        let matcher = builder.build().map_err(|e| GeoregionError::ConfigInvalid {
            key: format!("{} pattern", reader.format_name()),
            reason: e.to_string(),
        })?;

        self.readers.push(RegisteredReader { reader, matcher });
        Ok(())
    }

    /// First registered reader whose patterns match the file name
    pub fn find_reader(&self, path: &Path) -> Option<&dyn FormatReader> {
        let file_name = path.file_name()?.to_str()?;
        self.readers
            .iter()
            .find(|r| r.matcher.is_match(file_name))
            .map(|r| r.reader.as_ref())
    }

    /// Detect format and return appropriate reader
    pub fn detect_format(&self, path: &Path) -> Result<&dyn FormatReader> {
        self.find_reader(path)
            .ok_or_else(|| GeoregionError::UnsupportedFormat { path: path.to_path_buf() })
    }

    /// Order files for reading: grouped by reader in registration order,
    /// sorted by path within a reader. Files no reader claims are dropped.
    pub fn plan<I>(&self, files: I) -> Vec<(&dyn FormatReader, PathBuf)>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut claimed: Vec<(usize, PathBuf)> = files
            .into_iter()
            .filter_map(|path| {
                let file_name = path.file_name()?.to_str()?.to_string();
                let slot = self.readers.iter().position(|r| r.matcher.is_match(&file_name))?;
                Some((slot, path))
            })
            .collect();
        claimed.sort();

        claimed
            .into_iter()
            .map(|(slot, path)| (self.readers[slot].reader.as_ref(), path))
            .collect()
    }

    /// Get list of all supported file patterns
    pub fn supported_patterns(&self) -> Vec<String> {
        self.readers
            .iter()
            .flat_map(|r| r.reader.patterns())
            .map(|s| s.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

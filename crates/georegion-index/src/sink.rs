//! Output sinks for finished feature collections

use std::fs;
use std::path::PathBuf;

use georegion_core::error::{GeoregionError, Result};
use georegion_core::models::{Feature, FeatureCollection};
use georegion_core::ports::Sink;

/// Writes each collection as a pretty-printed GeoJSON file
///
/// Files are named `{Region_Name}-{Sub_Region_Name}.{extension}` inside the output root.
#[derive(Debug)]
pub struct GeoJsonFileSink {
    output_root: PathBuf,
    extension: String,
    written: Vec<PathBuf>,
}

impl GeoJsonFileSink {
    /// Create the sink, creating the output directory if it does not exist
    pub fn new(output_root: impl Into<PathBuf>, extension: impl Into<String>) -> Result<Self> {
        let output_root = output_root.into();
        fs::create_dir_all(&output_root)?;

        Ok(Self { output_root, extension: extension.into(), written: Vec::new() })
    }

    /// Paths written so far, in emit order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Sink for GeoJsonFileSink {
    fn emit(
        &mut self,
        region_name: &str,
        sub_region_name: &str,
        features: Vec<Feature>,
    ) -> Result<()> {
        let collection = FeatureCollection::new(region_name, sub_region_name, features);
        let path = self.output_root.join(collection.file_name(&self.extension));

        tracing::info!("--> Writing {} with {} features", path.display(), collection.len());

        let json = serde_json::to_string_pretty(&collection)
            .map_err(|e| GeoregionError::Serialization(format!("{}: {}", path.display(), e)))?;
        fs::write(&path, json)?;

        self.written.push(path);
        Ok(())
    }
}

/// Keeps emitted collections in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub collections: Vec<FeatureCollection>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_collections(self) -> Vec<FeatureCollection> {
        self.collections
    }
}

impl Sink for MemorySink {
    fn emit(
        &mut self,
        region_name: &str,
        sub_region_name: &str,
        features: Vec<Feature>,
    ) -> Result<()> {
        self.collections.push(FeatureCollection::new(region_name, sub_region_name, features));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use georegion_core::models::{Geometry, Properties};
    use tempfile::TempDir;

    #[test]
    fn test_file_sink_writes_named_collection() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("output");
        let mut sink = GeoJsonFileSink::new(&root, "geojson").unwrap();

        let feature = Feature::new("a", Geometry::point(1.0, 2.0), Properties::new());
        sink.emit("Italy", "Apulia", vec![feature]).unwrap();

        let path = root.join("Italy-Apulia.geojson");
        assert_eq!(sink.written(), &[path.clone()]);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["type"], "FeatureCollection");
        assert_eq!(written["features"][0]["type"], "Feature");
        assert_eq!(written["features"][0]["geometry"]["type"], "Point");
        assert_eq!(written["features"][0]["geometry"]["coordinates"][1], 2.0);
    }

    #[test]
    fn test_memory_sink_keeps_emit_order() {
        let mut sink = MemorySink::new();
        sink.emit("A", "X", vec![]).unwrap();
        sink.emit("A", "Y", vec![]).unwrap();

        let names: Vec<_> =
            sink.collections.iter().map(|c| c.sub_region_name.as_str()).collect();
        assert_eq!(names, vec!["X", "Y"]);
    }
}

//! Loading persisted feature collections (read path)

use std::path::Path;

use georegion_core::error::{GeoregionError, Result};
use georegion_core::formats::geojson::GeoJsonReader;
use georegion_core::formats::FormatReader;
use georegion_core::models::{identifier_of, DimensionPolicy, Feature, RawRecord};
use georegion_geo::dimension::to_planar;

use crate::builder::HierarchyBuilder;

/// Load and concatenate every `*.{extension}` collection directly inside `dir`
///
/// The extension matches case-insensitively and files are read in name order.
/// A feature with neither `ID` nor `id` aborts the load.
pub fn load_collections(dir: &Path, extension: &str) -> Result<Vec<Feature>> {
    if !dir.is_dir() {
        return Err(GeoregionError::InvalidPath {
            path: dir.to_path_buf(),
            reason: "GeoJSON root is not a directory".to_string(),
        });
    }

    let files = HierarchyBuilder::files_in(dir)?;
    let mut features = Vec::new();

    for path in files.into_iter().filter(|path| has_extension(path, extension)) {
        let batch = GeoJsonReader.read(&path)?;
        if batch.crs.as_ref().is_some_and(|crs| !crs.is_canonical()) {
            tracing::warn!(
                "{} declares CRS {:?}; coordinates are used as-is",
                path.display(),
                batch.crs
            );
        }

        let source_file = path.display().to_string();
        for record in batch.records {
            features.push(load_feature(record, &source_file)?);
        }
    }

    Ok(features)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension.trim_start_matches('.')))
}

fn load_feature(record: RawRecord, source_file: &str) -> Result<Feature> {
    let Some(id) = identifier_of(&record.properties) else {
        return Err(GeoregionError::MissingIdentifier {
            source_file: source_file.to_string(),
            record: record_json(&record),
        });
    };

    let geometry = match &record.geometry {
        Some(value) => to_planar(value, DimensionPolicy::Flatten),
        None => Err(GeoregionError::geometry(
            format!("{} feature {}", source_file, id),
            "feature has no geometry",
        )),
    }?;

    Ok(Feature::new(id, geometry, record.properties))
}

/// Full feature JSON for error reports
fn record_json(record: &RawRecord) -> String {
    serde_json::json!({
        "type": "Feature",
        "geometry": record.geometry.clone().map(geojson::Geometry::new),
        "properties": &record.properties,
    })
    .to_string()
}

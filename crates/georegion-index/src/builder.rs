//! Hierarchy Builder (write path)

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use georegion_core::config::LayeredConfig;
use georegion_core::error::{GeoregionError, Result};
use georegion_core::formats::FormatRegistry;
use georegion_core::models::{Feature, FeatureCollection};
use georegion_core::ports::Sink;

use crate::normalize::GeometryNormalizer;
use crate::sink::MemorySink;

/// A sub-region directory with its cleansed hierarchy position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRegionDir {
    pub region_name: String,
    pub sub_region_name: String,
    pub path: PathBuf,
}

/// Counts reported after a write run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub collections: usize,
    pub features: usize,
    pub source_files: usize,
}

pub struct HierarchyBuilder {
    registry: FormatRegistry,
    normalizer: GeometryNormalizer,
    region_prefix: String,
    sub_region_prefix: String,
}

impl HierarchyBuilder {
    pub fn new(
        registry: FormatRegistry,
        normalizer: GeometryNormalizer,
        region_prefix: impl Into<String>,
        sub_region_prefix: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            normalizer,
            region_prefix: region_prefix.into(),
            sub_region_prefix: sub_region_prefix.into(),
        }
    }

    /// Builder using the configured legacy prefixes
    pub fn from_config(
        config: &LayeredConfig,
        registry: FormatRegistry,
        normalizer: GeometryNormalizer,
    ) -> Self {
        Self::new(
            registry,
            normalizer,
            config.region_prefix.value.clone(),
            config.sub_region_prefix.value.clone(),
        )
    }

    /// Enumerate `root/region/sub_region` directories, sorted by name at both levels
    pub fn sub_region_dirs(&self, root: &Path) -> Result<Vec<SubRegionDir>> {
        if !root.is_dir() {
            return Err(GeoregionError::InvalidPath {
                path: root.to_path_buf(),
                reason: "Source root is not a directory".to_string(),
            });
        }

        let mut dirs = Vec::new();
        for region_dir in child_dirs(root)? {
            let region_name = strip_prefix(&region_dir, &self.region_prefix);
            for sub_region_dir in child_dirs(&region_dir)? {
                dirs.push(SubRegionDir {
                    region_name: region_name.clone(),
                    sub_region_name: strip_prefix(&sub_region_dir, &self.sub_region_prefix),
                    path: sub_region_dir,
                });
            }
        }
        Ok(dirs)
    }

    /// Read and normalize every source file of one sub-region directory
    ///
    /// Features follow reader registration order, then file name, then record order.
    pub fn build_sub_region(&self, dir: &SubRegionDir) -> Result<(Vec<Feature>, usize)> {
        let plan = self.registry.plan(Self::files_in(&dir.path)?);

        let mut features = Vec::new();
        for (reader, path) in &plan {
            let batch = reader.read(path)?;
            features.extend(self.normalizer.normalize_batch(
                batch,
                &dir.region_name,
                &dir.sub_region_name,
            )?);
        }
        Ok((features, plan.len()))
    }

    /// Regular files directly inside `dir`, sorted by name
    pub fn files_in(dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(child_entries(dir)?.into_iter().filter(|p| p.is_file()).collect())
    }

    /// Walk the source tree and emit one collection per sub-region
    ///
    /// The first failing sub-region aborts the run before it is emitted.
    pub fn build(&self, root: &Path, sink: &mut dyn Sink) -> Result<BuildSummary> {
        let mut summary = BuildSummary::default();

        for dir in self.sub_region_dirs(root)? {
            tracing::debug!(
                "Processing {} / {} in {}",
                dir.region_name,
                dir.sub_region_name,
                dir.path.display()
            );

            let (features, files) = self.build_sub_region(&dir)?;
            summary.collections += 1;
            summary.features += features.len();
            summary.source_files += files;

            sink.emit(&dir.region_name, &dir.sub_region_name, features)?;
        }

        Ok(summary)
    }

    /// Build into memory, mostly for tests and previews
    pub fn collect(&self, root: &Path) -> Result<Vec<FeatureCollection>> {
        let mut sink = MemorySink::new();
        self.build(root, &mut sink)?;
        Ok(sink.into_collections())
    }
}

fn child_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| GeoregionError::InvalidPath {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            reason: e.to_string(),
        })?;
        entries.push(entry.into_path());
    }
    Ok(entries)
}

fn child_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(child_entries(dir)?.into_iter().filter(|p| p.is_dir()).collect())
}

fn strip_prefix(path: &Path, prefix: &str) -> String {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    name.strip_prefix(prefix).unwrap_or(&name).to_string()
}

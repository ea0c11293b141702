//! Write command implementation

use crate::cli::WriteArgs;
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use crate::output_types::WriteOutput;
use anyhow::{Context, Result};
use georegion_core::config::CliConfigOverrides;
use georegion_core::formats::FormatRegistry;
use georegion_core::ports::UuidIdGenerator;
use georegion_geo::transform::ProjReprojector;
use georegion_index::{GeoJsonFileSink, GeometryNormalizer, HierarchyBuilder};
use std::path::Path;
use std::time::Instant;

pub fn execute(args: WriteArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let start = Instant::now();

    let config = load_config_with_overrides(
        config_path,
        CliConfigOverrides {
            region_prefix: args.region_prefix,
            sub_region_prefix: args.sub_region_prefix,
            dimension_policy: args.dimension_policy,
            tidy_buffer_distance: args.buffer_distance,
            strict_ids: None,
        },
    )?;

    let normalizer = GeometryNormalizer::new(
        Box::new(ProjReprojector),
        Box::new(UuidIdGenerator),
        config.dimension_policy(),
    );
    let builder =
        HierarchyBuilder::from_config(&config, FormatRegistry::with_source_formats()?, normalizer);

    let mut sink = GeoJsonFileSink::new(&args.output_root, config.output_extension.value.clone())
        .with_context(|| format!("Failed to create {}", args.output_root.display()))?;

    let summary = builder
        .build(&args.source_root, &mut sink)
        .with_context(|| format!("Failed to process {}", args.source_root.display()))?;
    let elapsed_secs = start.elapsed().as_secs_f64();

    if output.is_json() {
        output.result(WriteOutput {
            source_root: args.source_root.display().to_string(),
            output_root: args.output_root.display().to_string(),
            regions_processed: summary.collections,
            features_written: summary.features,
            source_files: summary.source_files,
            files: sink.written().iter().map(|p| p.display().to_string()).collect(),
            elapsed_secs,
        })?;
    } else {
        output.success(format!(
            "{} regions processed in {:.2} seconds.",
            summary.collections, elapsed_secs
        ));
    }

    Ok(())
}
